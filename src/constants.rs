//! Application-wide constants
//!
//! Single source of truth for the magic numbers and string literals used
//! across the host process.

/// Settings store keys and defaults
pub mod store {
    /// Directory under the user config dir holding the settings file
    pub const APP_DIR: &str = "share-area-desktop";

    /// Settings file name
    pub const FILENAME: &str = "settings.json";

    /// Key prefix for per-window geometry records (`windowState.<name>`)
    pub const WINDOW_STATE_PREFIX: &str = "windowState";

    /// Key for the open-document session slice
    pub const SESSION_KEY: &str = "session";

    /// Key for the UI layout slice
    pub const LAYOUT_KEY: &str = "layout";
}

/// Window geometry defaults and tracking
pub mod geometry {
    /// Minimum default width when deriving geometry from the display
    pub const MIN_DEFAULT_WIDTH: u32 = 1024;

    /// Minimum default height when deriving geometry from the display
    pub const MIN_DEFAULT_HEIGHT: u32 = 768;

    /// Debounce window for persisting move/resize bursts, in milliseconds
    pub const SAVE_DEBOUNCE_MS: u64 = 400;
}

/// Boot sequence timing and window content targets
pub mod boot {
    /// Splash window edge length (square, fixed size)
    pub const SPLASH_SIZE: u32 = 400;

    /// Delay from main-window-ready to splash teardown, in milliseconds
    pub const SPLASH_TEARDOWN_DELAY_MS: u64 = 500;

    /// Delay from main-window-ready to revealing the main window, in
    /// milliseconds. Measured from the same instant as the teardown delay,
    /// not chained after it.
    pub const MAIN_REVEAL_DELAY_MS: u64 = 1000;

    /// Content target loaded into the splash window
    pub const SPLASH_PAGE: &str = "splash.html";

    /// Content target loaded into the main window
    pub const MAIN_PAGE: &str = "mainwin.html";

    /// Name of the main window in the settings store
    pub const MAIN_WINDOW_NAME: &str = "mainwin";
}

/// UI layout defaults
pub mod layout {
    /// Default width of the left section, in pixels
    pub const DEFAULT_LEFT_SECTION_WIDTH: u32 = 320;
}
