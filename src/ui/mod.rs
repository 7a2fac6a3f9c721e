//! Terminal collaborators for the bulk operations
//!
//! The orchestrator never talks to the terminal directly; it goes through
//! these traits so tests can substitute recording implementations.

mod console;
mod format;

pub use console::{AutoConfirm, ConsoleGate, ConsoleNotifier, ConsoleProgress, ConsoleRenderer};
pub use format::{DefaultStatusFormatter, StatusFormatter};

use crate::api::types::TokenRecord;

/// Notification tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

/// Blocking yes/no prompt shown before a batch begins
pub trait ConfirmGate {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Live "N/M processed" feedback for a running batch
pub trait ProgressSink {
    fn busy(&self, label: &str);
    fn tick(&self, done: usize, total: usize);
    fn idle(&self);
}

/// One-shot end-of-batch notification
pub trait Notifier {
    fn notify(&self, tone: Tone, message: &str);
}

/// Re-draws the token table from the store after a mutation
pub trait Renderer {
    fn render(&self, tokens: &[TokenRecord]);
}
