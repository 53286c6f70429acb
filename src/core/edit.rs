//! Inline editing
//!
//! One crate-wide edit slot: at most one row, in at most one table, is
//! ever being edited. Commit happens on a non-shift Enter, on focus
//! loss, or on an explicit confirm; Escape cancels and discards the
//! buffer. Committing an empty or unchanged buffer is a silent no-op.

/// Which field is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    NetworkName { nid: i64 },
    ContentText { nid: i64, cid: i64 },
}

/// How a commit was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitTrigger {
    Enter { shift: bool },
    Blur,
    Confirm,
}

impl CommitTrigger {
    /// Shift-Enter inserts a newline instead of committing
    pub fn commits(&self) -> bool {
        !matches!(self, CommitTrigger::Enter { shift: true })
    }
}

/// An in-progress field edit
#[derive(Debug, Clone)]
pub struct InlineEdit {
    pub target: EditTarget,
    pub original: String,
    pub buffer: String,
}

impl InlineEdit {
    pub fn new(target: EditTarget, original: impl Into<String>) -> Self {
        let original = original.into();
        Self { target, buffer: original.clone(), original }
    }

    /// True when committing would change nothing: empty or unchanged
    pub fn is_noop(&self) -> bool {
        self.buffer.trim().is_empty() || self.buffer == self.original
    }

    /// Restore the buffer to the pre-edit text (failed-update recovery)
    pub fn revert(&mut self) {
        self.buffer = self.original.clone();
    }
}
