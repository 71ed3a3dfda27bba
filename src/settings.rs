//! Persistent key-value settings store
//!
//! Keys are dotted string paths (`windowState.mainwin`) addressing nested
//! objects in one JSON document. The store is a process-wide singleton
//! shared by independent state keepers; keys are disjoint so no cross-key
//! coordination is needed. All access is single-threaded.
//!
//! Absence and failure are distinct outcomes: a missing key is `Ok` (the
//! keepers fall back to defaults), an unreadable or corrupt document is an
//! error that propagates to the caller.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

/// Dotted-path key-value store for structured records
pub trait SettingsStore {
    /// Whether a value exists at `key`
    fn has(&self, key: &str) -> Result<bool>;

    /// Value at `key`, `None` when absent
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write `value` at `key`, replacing any prior value and creating
    /// intermediate objects along the path
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

fn get_path<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match key.split_once('.') {
        None => root.get(key),
        Some((head, rest)) => get_path(root.get(head)?.as_object()?, rest),
    }
}

fn set_path(root: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            root.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = root
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                // A scalar in the middle of the path is overwritten, same
                // as replacing any prior value at the full key.
                *entry = Value::Object(Map::new());
            }
            if let Some(map) = entry.as_object_mut() {
                set_path(map, rest, value);
            }
        }
    }
}

/// File-backed store: the whole document is held in memory and rewritten
/// on every `set`
pub struct JsonSettingsStore {
    path: PathBuf,
    root: Map<String, Value>,
}

impl JsonSettingsStore {
    /// Default location: `<config_dir>/share-area-desktop/settings.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::store::APP_DIR);
        path.push(crate::constants::store::FILENAME);
        path
    }

    pub fn open() -> Result<Self> {
        Self::open_at(Self::default_path())
    }

    /// Open a store at an explicit path. A missing file is an empty
    /// document; an unreadable or unparsable file is an error.
    pub fn open_at(path: PathBuf) -> Result<Self> {
        let root = match fs::read_to_string(&path) {
            Ok(contents) => {
                let value: Value = serde_json::from_str(&contents)
                    .with_context(|| format!("invalid settings file: {}", path.display()))?;
                match value {
                    Value::Object(map) => map,
                    _ => bail!("settings file is not a JSON object: {}", path.display()),
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no settings file found, starting empty");
                Map::new()
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read settings file: {}", path.display()));
            }
        };
        Ok(Self { path, root })
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create settings directory: {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(&self.root)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write settings file: {}", self.path.display()))
    }
}

impl SettingsStore for JsonSettingsStore {
    fn has(&self, key: &str) -> Result<bool> {
        Ok(get_path(&self.root, key).is_some())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(get_path(&self.root, key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        set_path(&mut self.root, key, value);
        self.persist()?;
        debug!(key = %key, "settings entry saved");
        Ok(())
    }
}

/// In-memory store for tests and embedding
#[derive(Default)]
pub struct MemoryStore {
    root: Map<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn has(&self, key: &str) -> Result<bool> {
        Ok(get_path(&self.root, key).is_some())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(get_path(&self.root, key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        set_path(&mut self.root, key, value);
        Ok(())
    }
}

/// Store wrapper that injects I/O failures, for exercising the error paths
/// of the keepers and the tracker
#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    pub(crate) struct FailingStore {
        inner: MemoryStore,
        pub(crate) fail_reads: Cell<bool>,
        pub(crate) fail_writes: Cell<bool>,
    }

    impl SettingsStore for FailingStore {
        fn has(&self, key: &str) -> Result<bool> {
            if self.fail_reads.get() {
                bail!("injected read failure");
            }
            self.inner.has(key)
        }

        fn get(&self, key: &str) -> Result<Option<Value>> {
            if self.fail_reads.get() {
                bail!("injected read failure");
            }
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: Value) -> Result<()> {
            if self.fail_writes.get() {
                bail!("injected write failure");
            }
            self.inner.set(key, value)
        }
    }
}
