//! Host-process core for the Share Area desktop application.
//!
//! Everything between process start and a visible, state-tracked main
//! window lives here: the splash→main boot sequence, the persisted
//! window/UI state keepers, the debounced geometry tracker, and the
//! command surface the renderer uses to drive window chrome.
//!
//! The windowing layer itself is an external collaborator: a platform
//! shell implements [`window::Platform`] and [`window::WindowHandle`]
//! and hands them to [`lifecycle::Orchestrator::boot`] on a
//! current-thread tokio runtime inside a `LocalSet`.

#![forbid(unsafe_code)]

pub mod bridge;
pub mod constants;
pub mod debounce;
pub mod keeper;
pub mod lifecycle;
pub mod logging;
pub mod settings;
pub mod window;
pub mod window_state;

pub use bridge::{BridgeCommand, BridgeReply, CommandBridge};
pub use debounce::Debouncer;
pub use keeper::{
    LayoutData, SessionState, SharedStore, StateKeeper, layout_state_keeper, session_state_keeper,
};
pub use lifecycle::{BootPhase, Orchestrator, ScheduledTask};
pub use settings::{JsonSettingsStore, MemoryStore, SettingsStore};
pub use window::{
    Bounds, DisplayMediaReply, Platform, ScreenSource, WindowEvent, WindowHandle, WindowOptions,
    WorkArea,
};
pub use window_state::{WindowState, WindowStateKeeper};
