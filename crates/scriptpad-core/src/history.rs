// Re-exports from scriptpad-history and conversions to the core types.
// Bridges the history crate's snapshots with `Cursor` and `TextBuffer`.
pub use scriptpad_history::{
    EditOperation, EditTarget, HistoryConfig, HistoryState, SelectionSnapshot, UndoManager,
};

use anyhow::Result;

use crate::buffer::TextBuffer;
use crate::cursor::Cursor;

impl EditTarget for TextBuffer {
    fn splice(&mut self, position: usize, remove_chars: usize, insert: &str) -> Result<()> {
        let end = position.saturating_add(remove_chars);
        self.replace(position, end, insert)
    }
}

impl From<SelectionSnapshot> for Cursor {
    fn from(s: SelectionSnapshot) -> Self {
        Cursor {
            anchor: s.anchor,
            caret: s.caret,
        }
    }
}

impl From<Cursor> for SelectionSnapshot {
    fn from(c: Cursor) -> Self {
        SelectionSnapshot {
            anchor: c.anchor,
            caret: c.caret,
        }
    }
}
