//! Persisted window geometry and the debounced tracker
//!
//! One `WindowState` record per named window, stored under
//! `windowState.<name>`. The tracker binds to a live window and keeps the
//! record in sync with move/resize/unmaximize events; persistence is
//! debounced so a drag gesture costs roughly one write instead of one per
//! event.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::constants::geometry;
use crate::debounce::Debouncer;
use crate::keeper::{SharedStore, StateKeeper};
use crate::window::{WindowEvent, WindowHandle, WorkArea};

/// Persisted geometry for one named window
///
/// `x`/`y` absent means the window has never been placed by the user;
/// the platform chooses placement. Width and height are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    pub width: u32,
    pub height: u32,
    pub is_maximized: bool,
}

impl WindowState {
    /// First-run geometry: half the primary work area, clamped to a
    /// 1024x768 minimum, position left to the platform
    pub fn default_for(work_area: WorkArea) -> Self {
        Self {
            x: None,
            y: None,
            width: (work_area.width / 2).max(geometry::MIN_DEFAULT_WIDTH),
            height: (work_area.height / 2).max(geometry::MIN_DEFAULT_HEIGHT),
            is_maximized: false,
        }
    }
}

/// State keeper specialized for window geometry, with live tracking
pub struct WindowStateKeeper {
    keeper: Rc<RefCell<StateKeeper<WindowState>>>,
    window_name: String,
    saver: Option<Rc<Debouncer<()>>>,
}

impl WindowStateKeeper {
    /// Load the geometry record for `window_name`, deriving the default
    /// from `work_area` when nothing is persisted yet
    pub fn load(store: SharedStore, window_name: &str, work_area: WorkArea) -> Result<Self> {
        let key = format!(
            "{}.{}",
            crate::constants::store::WINDOW_STATE_PREFIX,
            window_name
        );
        let keeper = StateKeeper::load(store, key, || WindowState::default_for(work_area))?;
        Ok(Self {
            keeper: Rc::new(RefCell::new(keeper)),
            window_name: window_name.to_string(),
            saver: None,
        })
    }

    /// Cached geometry (initial load or last successful save)
    pub fn state(&self) -> WindowState {
        self.keeper.borrow().get_state()
    }

    /// Bind the keeper to a live window.
    ///
    /// Move, resize and unmaximize all feed one shared debouncer, so an
    /// interleaved burst collapses into a single write 400ms after the
    /// last event of any kind. The save routine reads the window's bounds
    /// and maximized flag at fire time, not at event time.
    pub fn track(&mut self, window: Rc<dyn WindowHandle>) {
        let keeper = self.keeper.clone();
        let name = self.window_name.clone();
        let tracked = window.clone();
        let saver = Rc::new(Debouncer::new(
            Duration::from_millis(geometry::SAVE_DEBOUNCE_MS),
            move |()| {
                let bounds = tracked.bounds();
                let next = WindowState {
                    x: Some(bounds.x),
                    y: Some(bounds.y),
                    width: bounds.width,
                    height: bounds.height,
                    is_maximized: tracked.is_maximized(),
                };
                debug!(window = %name, state = ?next, "persisting window geometry");
                if let Err(error) = keeper.borrow_mut().save_state(next) {
                    // No retry or user-notification path exists here; the
                    // write is dropped and the cache keeps the old value.
                    warn!(window = %name, error = ?error, "failed to persist window geometry");
                }
            },
        ));

        for event in [WindowEvent::Move, WindowEvent::Resize, WindowEvent::Unmaximize] {
            let saver = saver.clone();
            window.on(event, Box::new(move || saver.call(())));
        }
        self.saver = Some(saver);
    }
}
