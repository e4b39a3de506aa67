//! One-shot timer scheduling

use std::time::Duration;

/// Callback run when a timer fires
pub type TimerCallback = Box<dyn FnOnce()>;

/// A pending one-shot timer
pub trait TimerHandle {
    /// Prevent the callback from running. Cancelling a timer that already
    /// fired does nothing.
    fn cancel(self: Box<Self>);
}

/// Arms one-shot timers on the host event loop
pub trait TimerScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> Box<dyn TimerHandle>;
}
