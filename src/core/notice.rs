//! User notices
//!
//! Best-effort notifications: save confirmations and error alerts.
//! The session pushes, the UI drains. Nothing here is fatal; a dropped
//! notice is just a missed toast.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::lock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(s) | Notice::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

#[derive(Default)]
pub struct NoticeQueue {
    queue: Mutex<VecDeque<Notice>>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self, text: impl Into<String>) {
        lock(&self.queue).push_back(Notice::Info(text.into()));
    }

    pub fn error(&self, text: impl Into<String>) {
        lock(&self.queue).push_back(Notice::Error(text.into()));
    }

    /// Remove and return all pending notices in arrival order
    pub fn drain(&self) -> Vec<Notice> {
        lock(&self.queue).drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.queue).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_arrival_order() {
        let notices = NoticeQueue::new();
        notices.info("saved");
        notices.error("boom");

        let drained = notices.drain();
        assert_eq!(drained, vec![
            Notice::Info("saved".to_string()),
            Notice::Error("boom".to_string()),
        ]);
        assert!(notices.is_empty());
    }
}
