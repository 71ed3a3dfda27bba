//! Boot orchestration: splash window, main window, reveal schedule
//!
//! The orchestrator owns the two windows of the application. It shows the
//! splash immediately, creates the main window hidden with its persisted
//! geometry, and once the main window can paint it tears the splash down
//! and reveals the main window on two independent timers. It also installs
//! the display-media handoff and the shutdown policy.
//!
//! Everything runs on one thread inside a `LocalSet`; boot failures are
//! caught at the top level and logged, leaving the process alive but
//! possibly without a visible window.

use anyhow::{Context, Result};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tokio::task::{JoinHandle, spawn_local};
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::bridge::CommandBridge;
use crate::constants::boot;
use crate::keeper::SharedStore;
use crate::window::{Platform, WindowHandle, WindowOptions};
use crate::window_state::WindowStateKeeper;

/// A delayed one-shot action with a retained cancellation handle.
///
/// Once scheduled it always fires unless cancelled or the process exits
/// first; dropping the handle detaches the task rather than aborting it.
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `action` after `delay`. Must be called inside a `LocalSet`.
    pub fn spawn(delay: Duration, action: impl FnOnce() + 'static) -> Self {
        let handle = spawn_local(async move {
            sleep(delay).await;
            action();
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

/// Where the boot sequence has gotten to. Strictly forward, single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BootPhase {
    NotStarted,
    SplashShown,
    MainReady,
    SplashTorn,
    MainShown,
}

fn advance_phase(phase: &Cell<BootPhase>, next: BootPhase) {
    // Splash reveal and main-window readiness may complete out of order;
    // the phase only ever moves forward.
    if next > phase.get() {
        debug!(phase = ?next, "boot phase");
        phase.set(next);
    }
}

/// Sequences process-ready → splash → main window → reveal, and owns the
/// main window for the rest of the process lifetime. The tracker and the
/// command bridge hold borrowed references; only the orchestrator destroys
/// windows.
pub struct Orchestrator {
    platform: Rc<dyn Platform>,
    store: SharedStore,
    /// Keep the process alive with zero windows (macOS dock convention)
    dock_persistence: bool,
    phase: Rc<Cell<BootPhase>>,
    main_window: RefCell<Option<Rc<dyn WindowHandle>>>,
    window_keeper: RefCell<Option<WindowStateKeeper>>,
    bridge: RefCell<Option<Rc<CommandBridge>>>,
    scheduled: Rc<RefCell<Vec<ScheduledTask>>>,
}

impl Orchestrator {
    pub fn new(platform: Rc<dyn Platform>, store: SharedStore) -> Self {
        Self {
            platform,
            store,
            dock_persistence: cfg!(target_os = "macos"),
            phase: Rc::new(Cell::new(BootPhase::NotStarted)),
            main_window: RefCell::new(None),
            window_keeper: RefCell::new(None),
            bridge: RefCell::new(None),
            scheduled: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn phase(&self) -> BootPhase {
        self.phase.get()
    }

    /// Bridge for the UI surface, available once boot has wired it
    pub fn bridge(&self) -> Option<Rc<CommandBridge>> {
        self.bridge.borrow().clone()
    }

    /// The main window, once created. The orchestrator retains ownership;
    /// callers get a borrowed handle and must not destroy it.
    pub fn main_window(&self) -> Option<Rc<dyn WindowHandle>> {
        self.main_window.borrow().clone()
    }

    /// Last known geometry of the main window
    pub fn window_state(&self) -> Option<crate::window_state::WindowState> {
        self.window_keeper
            .borrow()
            .as_ref()
            .map(|keeper| keeper.state())
    }

    /// Run the boot sequence. Any error is caught here and logged; the
    /// process continues, possibly without a visible window.
    pub async fn boot(&self) {
        info!("starting application boot sequence");
        if let Err(error) = self.run_boot().await {
            error!(error = ?error, "error during initialization");
        }
    }

    async fn run_boot(&self) -> Result<()> {
        self.platform.ready().await;
        let splash = self.create_splash_window()?;
        let main_window = self.create_main_window(splash)?;
        self.bridge.replace(Some(Rc::new(CommandBridge::new(
            self.platform.clone(),
            main_window,
        ))));
        self.install_display_media_handler();
        self.register_shutdown_policy();
        Ok(())
    }

    fn create_splash_window(&self) -> Result<Rc<dyn WindowHandle>> {
        debug!("creating splash window");
        let window = self
            .platform
            .create_window(WindowOptions {
                width: boot::SPLASH_SIZE,
                height: boot::SPLASH_SIZE,
                frame: false,
                transparent: true,
                always_on_top: true,
                resizable: false,
                center: true,
                visible: false,
                ..Default::default()
            })
            .context("failed to create splash window")?;
        window.load_content(boot::SPLASH_PAGE);

        let revealed = window.clone();
        let phase = self.phase.clone();
        window.once_ready_to_show(Box::new(move || {
            revealed.show();
            advance_phase(&phase, BootPhase::SplashShown);
        }));
        Ok(window)
    }

    fn create_main_window(&self, splash: Rc<dyn WindowHandle>) -> Result<Rc<dyn WindowHandle>> {
        debug!("creating main window");
        let mut keeper = WindowStateKeeper::load(
            self.store.clone(),
            boot::MAIN_WINDOW_NAME,
            self.platform.work_area(),
        )?;
        let state = keeper.state();

        let window = self
            .platform
            .create_window(WindowOptions {
                x: state.x,
                y: state.y,
                width: state.width,
                height: state.height,
                frame: false,
                resizable: true,
                visible: false,
                icon: if cfg!(target_os = "linux") {
                    Some("icon.png".to_string())
                } else {
                    None
                },
                ..Default::default()
            })
            .context("failed to create main window")?;
        window.load_content(boot::MAIN_PAGE);
        if state.is_maximized {
            window.maximize();
        }
        keeper.track(window.clone());

        let phase = self.phase.clone();
        let scheduled = self.scheduled.clone();
        let revealed = window.clone();
        window.once_ready_to_show(Box::new(move || {
            debug!("main window ready to show");
            advance_phase(&phase, BootPhase::MainReady);

            // Two independent timers from the same instant, never chained:
            // the splash teardown must not delay the main reveal.
            let teardown_phase = phase.clone();
            let teardown = ScheduledTask::spawn(
                Duration::from_millis(boot::SPLASH_TEARDOWN_DELAY_MS),
                move || {
                    debug!("destroying splash window");
                    splash.destroy();
                    advance_phase(&teardown_phase, BootPhase::SplashTorn);
                },
            );
            let reveal_phase = phase.clone();
            let reveal = ScheduledTask::spawn(
                Duration::from_millis(boot::MAIN_REVEAL_DELAY_MS),
                move || {
                    debug!("showing main window");
                    revealed.show();
                    advance_phase(&reveal_phase, BootPhase::MainShown);
                },
            );
            scheduled.borrow_mut().extend([teardown, reveal]);
        }));

        self.window_keeper.replace(Some(keeper));
        self.main_window.replace(Some(window.clone()));
        Ok(window)
    }

    fn install_display_media_handler(&self) {
        let platform = self.platform.clone();
        self.platform.set_display_media_handler(Box::new(move |reply| {
            let sources = match platform.list_screen_sources() {
                Ok(sources) => sources,
                Err(error) => {
                    error!(error = ?error, "error fetching screen sources");
                    Vec::new()
                }
            };
            debug!(count = sources.len(), "fetched screen sources");
            match sources.into_iter().next() {
                Some(source) => {
                    debug!(id = %source.id, name = %source.name, "handing off screen source");
                    reply(source);
                }
                // Leaving the request unanswered is the contract when
                // nothing can be captured.
                None => debug!("no screen source available"),
            }
        }));
    }

    fn register_shutdown_policy(&self) {
        let platform = self.platform.clone();
        let dock_persistence = self.dock_persistence;
        self.platform.on_all_windows_closed(Box::new(move || {
            if dock_persistence {
                debug!("all windows closed, keeping process alive");
                return;
            }
            platform.quit();
        }));
    }
}
