//! Document model combining text buffer, selection, history and viewport.
//!
//! Every mutation goes through a single private `edit` entry point that
//! validates the range, builds an `EditOperation`, applies it to the buffer
//! and records it. Undo and redo replay those operations, so any mutation a
//! client can make is exactly reversible. File I/O is in the `io` submodule.

mod io;

use std::path::PathBuf;

use anyhow::Result;

use crate::buffer::{out_of_range, TextBuffer};
use crate::cursor::{Cursor, Location};
use crate::encoding::{FileEncoding, LineEnding};
use crate::history::{EditOperation, HistoryConfig, HistoryState, SelectionSnapshot, UndoManager};
use crate::viewport::{ScrollPosition, Viewport, VisibleLines};

/// Default number of lines the viewport shows.
pub const DEFAULT_VIEWPORT_LINES: usize = 40;

/// Settings applied when a document is created or opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    pub history: HistoryConfig,
    pub viewport_lines: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            viewport_lines: DEFAULT_VIEWPORT_LINES,
        }
    }
}

/// Size snapshot of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Length in bytes of the in-memory (UTF-8, `\n`) text.
    pub length: usize,
    pub line_count: usize,
    /// Length in chars.
    pub text_length: usize,
}

/// A single document with its buffer, selection, history, and metadata.
pub struct Document {
    /// The text buffer.
    pub buffer: TextBuffer,
    /// The selection state.
    pub cursor: Cursor,
    /// Undo/redo history manager.
    pub history: UndoManager,
    /// Visible area.
    pub viewport: Viewport,
    /// File path on disk, if any.
    pub file_path: Option<PathBuf>,
    /// The encoding used for this document.
    pub encoding: FileEncoding,
    /// The line ending style restored on save.
    pub line_ending: LineEnding,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("buffer", &self.buffer)
            .field("cursor", &self.cursor)
            .field("file_path", &self.file_path)
            .field("encoding", &self.encoding)
            .field("line_ending", &self.line_ending)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a new empty document with default options.
    pub fn new() -> Self {
        Self::from_text("", &DocumentOptions::default())
    }

    /// Creates an untitled document holding `text` (taken verbatim).
    pub fn from_text(text: &str, options: &DocumentOptions) -> Self {
        let buffer = TextBuffer::from(text);
        let viewport = Viewport::new(options.viewport_lines, buffer.len_lines());
        Self {
            buffer,
            cursor: Cursor::new(),
            history: UndoManager::new(options.history.clone()),
            viewport,
            file_path: None,
            encoding: FileEncoding::default(),
            line_ending: LineEnding::default(),
        }
    }

    /// Re-derives everything that depends on the buffer length.
    fn sync_after_mutation(&mut self) {
        self.cursor.clamp_to(&self.buffer);
        self.viewport.set_total_lines(self.buffer.len_lines());
    }

    /// Replaces `[start, end)` with `text` as one undoable operation.
    ///
    /// The selection collapses to the end of the inserted text.
    fn edit(&mut self, start: usize, end: usize, text: &str) -> Result<()> {
        let deleted = self.buffer.slice(start, end)?.to_string();
        let before = SelectionSnapshot::from(self.cursor);
        let after = SelectionSnapshot::caret_at(start + text.chars().count());
        let op = EditOperation::new(start, deleted, text, before, after);

        op.apply(&mut self.buffer)?;
        if let Some(seq) = self.history.record(op) {
            tracing::debug!("Recorded edit #{seq} at {start}..{end}");
        }
        self.cursor = after.into();
        self.sync_after_mutation();
        Ok(())
    }

    /// Number of lines (always at least 1).
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Returns line `line_idx` including its terminator.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the line does not exist.
    pub fn line_text(&self, line_idx: usize) -> Result<String> {
        Ok(self.buffer.line(line_idx)?.to_string())
    }

    /// Replaces the full content of a line, terminator included, with `text`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the line does not exist.
    pub fn set_line(&mut self, line_idx: usize, text: &str) -> Result<()> {
        let (start, end) = self.buffer.line_char_range(line_idx)?;
        self.edit(start, end, text)
    }

    /// Returns `length` chars starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the range is past the end of the document.
    pub fn text(&self, offset: usize, length: usize) -> Result<String> {
        let end = self.range_end(offset, length)?;
        Ok(self.buffer.slice(offset, end)?.to_string())
    }

    /// The whole document text.
    pub fn full_text(&self) -> String {
        self.buffer.to_string()
    }

    /// Inserts `text` at char `offset`; `offset == len_chars` appends.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `offset` is past the end of the document.
    pub fn insert_text(&mut self, offset: usize, text: &str) -> Result<()> {
        self.edit(offset, offset, text)
    }

    /// Appends `text` at the end of the document.
    ///
    /// # Errors
    ///
    /// Only fails if the buffer rejects the edit.
    pub fn append_text(&mut self, text: &str) -> Result<()> {
        let end = self.buffer.len_chars();
        self.edit(end, end, text)
    }

    /// Replaces `length` chars at `offset` with `text`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the range is past the end of the document.
    pub fn replace_range(&mut self, offset: usize, length: usize, text: &str) -> Result<()> {
        let end = self.range_end(offset, length)?;
        self.edit(offset, end, text)
    }

    fn range_end(&self, offset: usize, length: usize) -> Result<usize> {
        offset
            .checked_add(length)
            .ok_or_else(|| out_of_range("range end", usize::MAX, self.buffer.len_chars()))
    }

    /// Selects `length` chars from `start`. Not recorded in history.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the range does not fit the document.
    pub fn set_selection(&mut self, start: usize, length: usize) -> Result<()> {
        self.cursor.select(&self.buffer, start, length)
    }

    /// Returns the selected text (empty for a plain caret).
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the selection no longer fits the buffer.
    pub fn selected_text(&self) -> Result<String> {
        self.cursor.selected_text(&self.buffer)
    }

    /// Both selection endpoints, start first.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the selection no longer fits the buffer.
    pub fn selection_range(&self) -> Result<(Location, Location)> {
        let (start, end) = self.cursor.range();
        Ok((
            Location::at(&self.buffer, start)?,
            Location::at(&self.buffer, end)?,
        ))
    }

    /// Location of the caret.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the caret no longer fits the buffer.
    pub fn caret_position(&self) -> Result<Location> {
        Location::at(&self.buffer, self.cursor.caret)
    }

    /// Identifier touching the caret, or an empty string.
    pub fn symbol(&self) -> String {
        self.cursor.symbol(&self.buffer)
    }

    /// Reverts the most recent edit.
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer rejects the replay; history is left
    /// as it was before the call.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(op) = self.history.undo() else {
            return Ok(false);
        };
        self.history.pause_recording();
        let result = op.revert(&mut self.buffer);
        self.history.resume_recording();
        if let Err(e) = result {
            self.history.restore_undone();
            return Err(e);
        }
        self.cursor = op.selection_before.into();
        self.sync_after_mutation();
        tracing::debug!("Undid edit #{}", op.seq);
        Ok(true)
    }

    /// Re-applies the most recently undone edit.
    ///
    /// Returns `Ok(false)` when there is nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer rejects the replay; history is left
    /// as it was before the call.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(op) = self.history.redo() else {
            return Ok(false);
        };
        self.history.pause_recording();
        let result = op.apply(&mut self.buffer);
        self.history.resume_recording();
        if let Err(e) = result {
            self.history.restore_redone();
            return Err(e);
        }
        self.cursor = op.selection_after.into();
        self.sync_after_mutation();
        tracing::debug!("Redid edit #{}", op.seq);
        Ok(true)
    }

    /// Whether the content differs from the last opened/saved state.
    pub fn is_modified(&self) -> bool {
        self.history.is_modified()
    }

    /// Modified/undo/redo flags.
    pub fn history_state(&self) -> HistoryState {
        self.history.state()
    }

    /// Size snapshot computed now.
    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            length: self.buffer.len_bytes(),
            line_count: self.buffer.len_lines(),
            text_length: self.buffer.len_chars(),
        }
    }

    pub fn visible_lines(&self) -> VisibleLines {
        self.viewport.visible_lines()
    }

    pub fn scroll_position(&self) -> ScrollPosition {
        self.viewport.scroll_position()
    }

    /// Scrolls so 1-indexed `line` is on top, clamped to the document.
    pub fn scroll_to_line(&mut self, line: usize) {
        self.viewport.scroll_to_line(line);
    }
}
