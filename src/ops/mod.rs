//! Bulk operation orchestration
//!
//! Sequential, throttled batch execution over the token store, with per-item
//! error isolation and a single summary notification per batch.

mod bulk;

pub use bulk::TokenController;

use std::sync::Arc;
use std::time::Duration;

use crate::ui::ProgressSink;

/// Per-batch outcome tally
///
/// `succeeded + failed` always equals the number of items attempted; a
/// session-level abort counts the item that hit it as exactly one failure.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchTally {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchTally {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Inter-item throttle delays, bounding load on the backend
#[derive(Debug, Clone, Copy)]
pub struct BatchDelays {
    /// Delay between token tests
    pub test: Duration,
    /// Delay between enable/disable calls
    pub toggle: Duration,
}

impl Default for BatchDelays {
    fn default() -> Self {
        Self {
            test: Duration::from_millis(150),
            toggle: Duration::from_millis(100),
        }
    }
}

/// Scoped busy state: acquired before a batch runs, released on every exit
/// path including panics and early returns
pub(crate) struct BusyGuard {
    progress: Arc<dyn ProgressSink>,
}

impl BusyGuard {
    pub fn start(progress: Arc<dyn ProgressSink>, label: &str) -> Self {
        progress.busy(label);
        Self { progress }
    }

    pub fn tick(&self, done: usize, total: usize) {
        self.progress.tick(done, total);
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.progress.idle();
    }
}
