//! Command-dispatch bridge
//!
//! The boundary through which the UI surface controls window chrome and
//! queries application metadata. Commands arrive as tagged records
//! (`{"cmd": "resizeWindow", ...}`); the main window is the implicit
//! target of every window-affecting command.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

use crate::window::{Platform, WindowHandle};

/// A request from the UI surface
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum BridgeCommand {
    GetAppVersion,
    CloseApp,
    MinimizeWindow,
    ToggleMaxWindow,
    GetWindowSize,
    ResizeWindow { width: u32, height: u32 },
    DebugLog { message: String },
}

/// Result handed back to the UI surface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BridgeReply {
    /// Command executed, nothing to report
    Ack,
    AppVersion(String),
    WindowSize { width: u32, height: u32 },
}

/// Dispatcher wired to the main window after it exists
pub struct CommandBridge {
    platform: Rc<dyn Platform>,
    main_window: Rc<dyn WindowHandle>,
}

impl CommandBridge {
    pub fn new(platform: Rc<dyn Platform>, main_window: Rc<dyn WindowHandle>) -> Self {
        Self {
            platform,
            main_window,
        }
    }

    pub fn dispatch(&self, command: BridgeCommand) -> BridgeReply {
        match command {
            BridgeCommand::GetAppVersion => BridgeReply::AppVersion(self.platform.app_version()),
            BridgeCommand::CloseApp => {
                self.platform.quit();
                BridgeReply::Ack
            }
            BridgeCommand::MinimizeWindow => {
                self.main_window.minimize();
                BridgeReply::Ack
            }
            BridgeCommand::ToggleMaxWindow => {
                if self.main_window.is_maximized() {
                    self.main_window.unmaximize();
                } else {
                    self.main_window.maximize();
                }
                BridgeReply::Ack
            }
            BridgeCommand::GetWindowSize => {
                let bounds = self.main_window.bounds();
                BridgeReply::WindowSize {
                    width: bounds.width,
                    height: bounds.height,
                }
            }
            BridgeCommand::ResizeWindow { width, height } => {
                self.main_window.set_size(width, height);
                BridgeReply::Ack
            }
            BridgeCommand::DebugLog { message } => {
                debug!(target: "renderer", message = %message);
                BridgeReply::Ack
            }
        }
    }
}
