//! Trailing-edge call coalescer
//!
//! Collapses bursts of calls into one delivery: each call supersedes any
//! pending delivery and re-arms the timer, so the wrapped callback runs
//! once per quiet period with the most recent argument. Used by the window
//! state tracker to bound settings writes during a drag.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};

/// Debounced wrapper around a callback.
///
/// The wait duration is fixed at construction. Deliveries are
/// trailing-edge only and last-write-wins; nothing queues and no return
/// value comes back from the callback. A pending delivery dies with the
/// `Debouncer`.
///
/// Single-threaded by design: must be created on a task running inside a
/// `LocalSet`, and the callback runs on that same thread.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: 'static> Debouncer<T> {
    pub fn new<F>(wait: Duration, mut callback: F) -> Self
    where
        F: FnMut(T) + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        tokio::task::spawn_local(async move {
            // One timer for the lifetime of the debouncer, re-armed in
            // place on every call.
            let timer = sleep(wait);
            tokio::pin!(timer);
            let mut pending: Option<T> = None;
            loop {
                tokio::select! {
                    received = rx.recv() => match received {
                        Some(arg) => {
                            pending = Some(arg);
                            timer.as_mut().reset(Instant::now() + wait);
                        }
                        // Debouncer dropped: cancel any pending delivery.
                        None => break,
                    },
                    () = timer.as_mut(), if pending.is_some() => {
                        if let Some(arg) = pending.take() {
                            callback(arg);
                        }
                    }
                }
            }
        });
        Self { tx }
    }

    /// Schedule a delivery of `arg`, superseding any pending one
    pub fn call(&self, arg: T) {
        // The receiver task lives as long as self; send only fails during
        // runtime teardown, where dropping the delivery is the intent.
        let _ = self.tx.send(arg);
    }
}
