//! Edit operations: self-inverting command objects for the undo stack.
use anyhow::{Context, Result};

/// Anything an `EditOperation` can be applied to.
///
/// Implementors replace `remove_chars` characters starting at char index
/// `position` with `insert`, failing without side effects when the range is
/// out of bounds.
pub trait EditTarget {
    fn splice(&mut self, position: usize, remove_chars: usize, insert: &str) -> Result<()>;
}

/// Selection state captured around an edit, as char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSnapshot {
    /// Fixed end of the selection.
    pub anchor: usize,
    /// Moving end of the selection (the caret).
    pub caret: usize,
}

impl SelectionSnapshot {
    pub fn new(anchor: usize, caret: usize) -> Self {
        Self { anchor, caret }
    }

    /// A collapsed selection (caret only) at `offset`.
    pub fn caret_at(offset: usize) -> Self {
        Self {
            anchor: offset,
            caret: offset,
        }
    }
}

/// A single atomic edit: `deleted` at `position` was replaced by `inserted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    /// Monotonic sequence number assigned by the `UndoManager` (0 until recorded).
    pub seq: u64,
    /// Char index where the edit occurred.
    pub position: usize,
    /// Text that was removed (empty for pure insertions).
    pub deleted: String,
    /// Text that was inserted (empty for pure deletions).
    pub inserted: String,
    /// Selection before the edit.
    pub selection_before: SelectionSnapshot,
    /// Selection after the edit.
    pub selection_after: SelectionSnapshot,
}

impl EditOperation {
    /// Builds an unrecorded operation.
    pub fn new(
        position: usize,
        deleted: impl Into<String>,
        inserted: impl Into<String>,
        selection_before: SelectionSnapshot,
        selection_after: SelectionSnapshot,
    ) -> Self {
        Self {
            seq: 0,
            position,
            deleted: deleted.into(),
            inserted: inserted.into(),
            selection_before,
            selection_after,
        }
    }

    /// Number of chars removed by the forward edit.
    pub fn deleted_chars(&self) -> usize {
        self.deleted.chars().count()
    }

    /// Number of chars added by the forward edit.
    pub fn inserted_chars(&self) -> usize {
        self.inserted.chars().count()
    }

    /// Returns the operation that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            seq: self.seq,
            position: self.position,
            deleted: self.inserted.clone(),
            inserted: self.deleted.clone(),
            selection_before: self.selection_after,
            selection_after: self.selection_before,
        }
    }

    /// Applies the forward edit.
    ///
    /// # Errors
    ///
    /// Returns an error if the target rejects the range.
    pub fn apply<T: EditTarget + ?Sized>(&self, target: &mut T) -> Result<()> {
        target
            .splice(self.position, self.deleted_chars(), &self.inserted)
            .with_context(|| format!("failed to apply edit #{}", self.seq))
    }

    /// Reverts the edit, restoring the text that was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the target rejects the range.
    pub fn revert<T: EditTarget + ?Sized>(&self, target: &mut T) -> Result<()> {
        target
            .splice(self.position, self.inserted_chars(), &self.deleted)
            .with_context(|| format!("failed to revert edit #{}", self.seq))
    }
}
