//! Windowing-layer contracts
//!
//! The host process never talks to the OS windowing stack directly; a
//! platform shell implements these traits and hands them in. Everything is
//! single-threaded (`Rc`, interior mutability in the implementations), per
//! the cooperative task model of the rest of the crate.

use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// Usable area of the primary display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkArea {
    pub width: u32,
    pub height: u32,
}

/// Live window geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Window events the geometry tracker listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    Move,
    Resize,
    Unmaximize,
}

/// Creation options for a window
///
/// `x`/`y` of `None` let the platform choose placement (or center, when
/// `center` is set).
#[derive(Debug, Clone, Default)]
pub struct WindowOptions {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: u32,
    pub height: u32,
    pub frame: bool,
    pub transparent: bool,
    pub always_on_top: bool,
    pub resizable: bool,
    pub center: bool,
    pub visible: bool,
    pub icon: Option<String>,
}

/// Screen-capture source as enumerated by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSource {
    pub id: String,
    pub name: String,
    pub thumbnail: Vec<u8>,
}

/// One-shot reply delivering the chosen capture source for a
/// display-media request. Dropping it unanswered is a valid outcome.
pub type DisplayMediaReply = Box<dyn FnOnce(ScreenSource)>;

/// Opaque reference to a live on-screen window
pub trait WindowHandle {
    fn load_content(&self, target: &str);
    fn show(&self);
    fn destroy(&self);
    fn bounds(&self) -> Bounds;
    fn is_maximized(&self) -> bool;
    fn minimize(&self);
    fn maximize(&self);
    fn unmaximize(&self);
    fn set_size(&self, width: u32, height: u32);
    /// Run `callback` once, when the content has loaded and first paint is
    /// possible
    fn once_ready_to_show(&self, callback: Box<dyn FnOnce()>);
    /// Register a listener for a geometry-changing event
    fn on(&self, event: WindowEvent, callback: Box<dyn FnMut()>);
}

/// The host environment: process readiness, display metrics, window
/// creation, capture-source enumeration, process control
pub trait Platform {
    /// Resolves when the host process is ready to create windows
    fn ready(&self) -> Pin<Box<dyn Future<Output = ()> + '_>>;
    fn work_area(&self) -> WorkArea;
    fn create_window(&self, options: WindowOptions) -> Result<Rc<dyn WindowHandle>>;
    fn list_screen_sources(&self) -> Result<Vec<ScreenSource>>;
    /// Install the handler invoked on each display-media request
    fn set_display_media_handler(&self, handler: Box<dyn Fn(DisplayMediaReply)>);
    fn on_all_windows_closed(&self, callback: Box<dyn FnMut()>);
    fn app_version(&self) -> String;
    fn quit(&self);
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording fakes for the windowing layer. Operations are stamped
    //! with the (virtual) clock so lifecycle tests can assert ordering.

    use super::*;
    use anyhow::bail;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use tokio::time::Instant;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum WindowOp {
        Loaded,
        Shown,
        Destroyed,
        Minimized,
        Maximized,
        Unmaximized,
        Resized,
    }

    pub(crate) struct MockWindow {
        pub(crate) options: WindowOptions,
        pub(crate) bounds: Cell<Bounds>,
        pub(crate) maximized: Cell<bool>,
        pub(crate) loaded: RefCell<Option<String>>,
        pub(crate) ops: RefCell<Vec<(Instant, WindowOp)>>,
        listeners: RefCell<HashMap<WindowEvent, Vec<Box<dyn FnMut()>>>>,
        ready_callbacks: RefCell<Vec<Box<dyn FnOnce()>>>,
    }

    impl MockWindow {
        pub(crate) fn new(options: WindowOptions) -> Self {
            let bounds = Bounds {
                x: options.x.unwrap_or(0),
                y: options.y.unwrap_or(0),
                width: options.width,
                height: options.height,
            };
            Self {
                options,
                bounds: Cell::new(bounds),
                maximized: Cell::new(false),
                loaded: RefCell::new(None),
                ops: RefCell::new(Vec::new()),
                listeners: RefCell::new(HashMap::new()),
                ready_callbacks: RefCell::new(Vec::new()),
            }
        }

        fn record(&self, op: WindowOp) {
            self.ops.borrow_mut().push((Instant::now(), op));
        }

        pub(crate) fn emit(&self, event: WindowEvent) {
            let mut listeners = self.listeners.borrow_mut();
            if let Some(callbacks) = listeners.get_mut(&event) {
                for callback in callbacks.iter_mut() {
                    callback();
                }
            }
        }

        pub(crate) fn emit_ready_to_show(&self) {
            let callbacks: Vec<_> = self.ready_callbacks.borrow_mut().drain(..).collect();
            for callback in callbacks {
                callback();
            }
        }

        /// Instant of the first occurrence of `op`, if any
        pub(crate) fn op_at(&self, op: WindowOp) -> Option<Instant> {
            self.ops
                .borrow()
                .iter()
                .find(|(_, recorded)| *recorded == op)
                .map(|(at, _)| *at)
        }

        pub(crate) fn op_count(&self, op: WindowOp) -> usize {
            self.ops
                .borrow()
                .iter()
                .filter(|(_, recorded)| *recorded == op)
                .count()
        }
    }

    impl WindowHandle for MockWindow {
        fn load_content(&self, target: &str) {
            *self.loaded.borrow_mut() = Some(target.to_string());
            self.record(WindowOp::Loaded);
        }

        fn show(&self) {
            self.record(WindowOp::Shown);
        }

        fn destroy(&self) {
            self.record(WindowOp::Destroyed);
        }

        fn bounds(&self) -> Bounds {
            self.bounds.get()
        }

        fn is_maximized(&self) -> bool {
            self.maximized.get()
        }

        fn minimize(&self) {
            self.record(WindowOp::Minimized);
        }

        fn maximize(&self) {
            self.maximized.set(true);
            self.record(WindowOp::Maximized);
        }

        fn unmaximize(&self) {
            self.maximized.set(false);
            self.record(WindowOp::Unmaximized);
        }

        fn set_size(&self, width: u32, height: u32) {
            let mut bounds = self.bounds.get();
            bounds.width = width;
            bounds.height = height;
            self.bounds.set(bounds);
            self.record(WindowOp::Resized);
        }

        fn once_ready_to_show(&self, callback: Box<dyn FnOnce()>) {
            self.ready_callbacks.borrow_mut().push(callback);
        }

        fn on(&self, event: WindowEvent, callback: Box<dyn FnMut()>) {
            self.listeners
                .borrow_mut()
                .entry(event)
                .or_default()
                .push(callback);
        }
    }

    pub(crate) struct MockPlatform {
        pub(crate) work_area: Cell<WorkArea>,
        pub(crate) windows: RefCell<Vec<Rc<MockWindow>>>,
        pub(crate) sources: RefCell<Vec<ScreenSource>>,
        pub(crate) fail_sources: Cell<bool>,
        pub(crate) fail_create: Cell<bool>,
        pub(crate) quit_count: Cell<u32>,
        display_media_handler: RefCell<Option<Box<dyn Fn(DisplayMediaReply)>>>,
        all_windows_closed: RefCell<Option<Box<dyn FnMut()>>>,
    }

    impl MockPlatform {
        pub(crate) fn new(work_area: WorkArea) -> Rc<Self> {
            Rc::new(Self {
                work_area: Cell::new(work_area),
                windows: RefCell::new(Vec::new()),
                sources: RefCell::new(Vec::new()),
                fail_sources: Cell::new(false),
                fail_create: Cell::new(false),
                quit_count: Cell::new(0),
                display_media_handler: RefCell::new(None),
                all_windows_closed: RefCell::new(None),
            })
        }

        pub(crate) fn window(&self, idx: usize) -> Rc<MockWindow> {
            self.windows.borrow()[idx].clone()
        }

        /// Simulate the environment asking for a display-media source
        pub(crate) fn request_display_media(&self, reply: DisplayMediaReply) {
            if let Some(handler) = self.display_media_handler.borrow().as_ref() {
                handler(reply);
            }
        }

        pub(crate) fn emit_all_windows_closed(&self) {
            if let Some(callback) = self.all_windows_closed.borrow_mut().as_mut() {
                callback();
            }
        }
    }

    impl Platform for MockPlatform {
        fn ready(&self) -> Pin<Box<dyn Future<Output = ()> + '_>> {
            Box::pin(async {})
        }

        fn work_area(&self) -> WorkArea {
            self.work_area.get()
        }

        fn create_window(&self, options: WindowOptions) -> Result<Rc<dyn WindowHandle>> {
            if self.fail_create.get() {
                bail!("injected window creation failure");
            }
            let window = Rc::new(MockWindow::new(options));
            self.windows.borrow_mut().push(window.clone());
            Ok(window)
        }

        fn list_screen_sources(&self) -> Result<Vec<ScreenSource>> {
            if self.fail_sources.get() {
                bail!("injected enumeration failure");
            }
            Ok(self.sources.borrow().clone())
        }

        fn set_display_media_handler(&self, handler: Box<dyn Fn(DisplayMediaReply)>) {
            *self.display_media_handler.borrow_mut() = Some(handler);
        }

        fn on_all_windows_closed(&self, callback: Box<dyn FnMut()>) {
            *self.all_windows_closed.borrow_mut() = Some(callback);
        }

        fn app_version(&self) -> String {
            env!("CARGO_PKG_VERSION").to_string()
        }

        fn quit(&self) {
            self.quit_count.set(self.quit_count.get() + 1);
        }
    }
}
