//! User-visible notices
//!
//! A notice is a short, transient message. Sending one never blocks and
//! never fails from the caller's point of view.

use std::sync::{Arc, Mutex};
use tracing::info;

/// Fire-and-forget message sink
pub trait Notifier {
    fn notice(&self, message: &str);
}

/// Sends notices to the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notice(&self, message: &str) {
        info!(notice = %message);
    }
}

/// Keeps every notice so tests can inspect them
///
/// Clones share the same list.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices received so far, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Notifier for RecordingNotifier {
    fn notice(&self, message: &str) {
        let mut messages = self
            .messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        messages.push(message.to_string());
    }
}
