//! Lazy-load/save state keepers over the settings store
//!
//! A keeper loads its slice of state once at construction (persisted value
//! if the key exists, computed default otherwise) and then serves the
//! cached value for the rest of the process lifetime. Saves go through to
//! the store; the cache only takes the new value when the write succeeds,
//! so a failed save leaves the cache at its pre-call value and the caller
//! holding the error.
//!
//! Besides window geometry (see `window_state`), two small slices ride on
//! this pattern: the open-document session and the UI layout. Both are
//! owned and mutated by collaborators outside this crate; only the
//! load/save primitive lives here.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

use crate::constants;
use crate::settings::SettingsStore;

/// The settings store as shared by all keepers in the process
pub type SharedStore = Rc<RefCell<dyn SettingsStore>>;

/// Load-once, cache-and-save abstraction over one settings key
pub struct StateKeeper<S> {
    store: SharedStore,
    key: String,
    state: S,
}

impl<S: Serialize + DeserializeOwned> StateKeeper<S> {
    /// Load the keeper for `key`. An absent key takes `default()`; a store
    /// read failure or a corrupt persisted record propagates as an error.
    pub fn load(
        store: SharedStore,
        key: impl Into<String>,
        default: impl FnOnce() -> S,
    ) -> Result<Self> {
        let key = key.into();
        let state = if store.borrow().has(&key)? {
            let value = store
                .borrow()
                .get(&key)?
                .with_context(|| format!("settings key '{key}' vanished between has and get"))?;
            serde_json::from_value(value)
                .with_context(|| format!("corrupt record at settings key '{key}'"))?
        } else {
            debug!(key = %key, "no persisted state, using default");
            default()
        };
        Ok(Self { store, key, state })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Cached value; never re-reads the store
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Owned copy of the cached value
    pub fn get_state(&self) -> S
    where
        S: Clone,
    {
        self.state.clone()
    }

    /// Persist `next` and, on success, make it the cached value
    pub fn save_state(&mut self, next: S) -> Result<()> {
        let value = serde_json::to_value(&next)?;
        self.store
            .borrow_mut()
            .set(&self.key, value)
            .with_context(|| format!("failed to persist settings key '{}'", self.key))?;
        self.state = next;
        Ok(())
    }
}

/// Open-document context persisted across runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub active_collection_name: Option<String>,
    pub active_file_filepath: Option<String>,
    pub active_request_idx: Option<u32>,
}

/// UI layout persisted across runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutData {
    #[serde(default = "default_left_section_width")]
    pub left_section_width: u32,
}

fn default_left_section_width() -> u32 {
    constants::layout::DEFAULT_LEFT_SECTION_WIDTH
}

impl Default for LayoutData {
    fn default() -> Self {
        Self {
            left_section_width: default_left_section_width(),
        }
    }
}

/// Keeper for the `session` slice
pub fn session_state_keeper(store: SharedStore) -> Result<StateKeeper<SessionState>> {
    StateKeeper::load(store, constants::store::SESSION_KEY, SessionState::default)
}

/// Keeper for the `layout` slice
pub fn layout_state_keeper(store: SharedStore) -> Result<StateKeeper<LayoutData>> {
    StateKeeper::load(store, constants::store::LAYOUT_KEY, LayoutData::default)
}
