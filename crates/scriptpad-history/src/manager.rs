//! Linear undo/redo manager with save-point tracking.
//!
//! Any new edit invalidates the redo stack. The manager remembers which
//! operation was on top of the undo stack when the document was last opened
//! or saved, so "modified" is answered by comparing against that point
//! instead of a flag that every caller must remember to flip.

use crate::config::HistoryConfig;
use crate::operation::EditOperation;

/// Where the document content matches what is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SavePoint {
    /// Clean when the undo stack top has this seq (`None` = empty stack).
    At(Option<u64>),
    /// The saved state was evicted from history and can never be reached again.
    Unreachable,
}

/// Snapshot of the history flags reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryState {
    pub modified: bool,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Manages undo/redo history for a single document.
pub struct UndoManager {
    /// Undo stack, oldest first.
    undo_stack: Vec<EditOperation>,
    /// Redo stack, most-recently-undone on top.
    redo_stack: Vec<EditOperation>,
    /// Next sequence number to assign.
    next_seq: u64,
    /// Whether recording is active (false during undo/redo replay).
    recording: bool,
    save_point: SavePoint,
    config: HistoryConfig,
}

impl std::fmt::Debug for UndoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoManager")
            .field("undo_len", &self.undo_stack.len())
            .field("redo_len", &self.redo_stack.len())
            .field("next_seq", &self.next_seq)
            .field("recording", &self.recording)
            .field("save_point", &self.save_point)
            .finish()
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl UndoManager {
    /// Creates an empty manager. The empty state counts as saved.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            next_seq: 1,
            recording: true,
            save_point: SavePoint::At(None),
            config: config.sanitized(),
        }
    }

    /// Records an edit operation and returns its assigned sequence number.
    ///
    /// Clears the redo stack. Returns `None` without recording when recording
    /// is paused. An edit that rewrites text with identical text is still
    /// recorded so it pairs with exactly one undo.
    pub fn record(&mut self, mut op: EditOperation) -> Option<u64> {
        if !self.recording {
            return None;
        }

        op.seq = self.next_seq;
        self.next_seq += 1;
        self.undo_stack.push(op);
        self.redo_stack.clear();

        if self.undo_stack.len() > self.config.max_history_depth {
            let excess = self.undo_stack.len() - self.config.max_history_depth;
            let evicted: Vec<u64> = self.undo_stack.drain(..excess).map(|o| o.seq).collect();
            // The empty-stack save point is gone once the bottom of history is dropped.
            if self.save_point == SavePoint::At(None) {
                self.save_point = SavePoint::Unreachable;
            }
            tracing::debug!(
                "Evicted {} oldest edit(s) from history (seq {:?})",
                evicted.len(),
                evicted.first()
            );
        }

        Some(self.next_seq - 1)
    }

    /// Pops the most recent operation for reverting.
    ///
    /// Returns `None` if there is nothing to undo.
    pub fn undo(&mut self) -> Option<EditOperation> {
        let op = self.undo_stack.pop()?;
        self.redo_stack.push(op.clone());
        Some(op)
    }

    /// Pops the most recently undone operation for re-applying.
    ///
    /// Returns `None` if there is nothing to redo.
    pub fn redo(&mut self) -> Option<EditOperation> {
        let op = self.redo_stack.pop()?;
        self.undo_stack.push(op.clone());
        Some(op)
    }

    /// Puts an operation back after a failed revert so history stays aligned
    /// with the buffer.
    pub fn restore_undone(&mut self) {
        if let Some(op) = self.redo_stack.pop() {
            self.undo_stack.push(op);
        }
    }

    /// Puts an operation back after a failed re-apply.
    pub fn restore_redone(&mut self) {
        if let Some(op) = self.undo_stack.pop() {
            self.redo_stack.push(op);
        }
    }

    /// Whether undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of operations on the undo stack.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of operations on the redo stack.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Marks the current position as matching the file on disk.
    pub fn mark_saved(&mut self) {
        self.save_point = SavePoint::At(self.top_seq());
    }

    /// True iff the content differs from the last opened/saved state.
    pub fn is_modified(&self) -> bool {
        match self.save_point {
            SavePoint::At(seq) => seq != self.top_seq(),
            SavePoint::Unreachable => true,
        }
    }

    /// Returns the modified/undo/redo flags in one snapshot.
    pub fn state(&self) -> HistoryState {
        HistoryState {
            modified: self.is_modified(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Temporarily disables recording (used during undo/redo replay).
    pub fn pause_recording(&mut self) {
        self.recording = false;
    }

    /// Re-enables recording after a pause.
    pub fn resume_recording(&mut self) {
        self.recording = true;
    }

    fn top_seq(&self) -> Option<u64> {
        self.undo_stack.last().map(|op| op.seq)
    }
}
