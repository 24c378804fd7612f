/// Caret and selection model, plus exact offset <-> position translation.
use crate::buffer::{out_of_range, TextBuffer};
use anyhow::Result;

/// Represents a position in the text as line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// 0-indexed line number.
    pub line: usize,
    /// 0-indexed column (char offset within the line).
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line.cmp(&other.line).then(self.col.cmp(&other.col))
    }
}

/// A resolved location: position plus the raw char offset it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub position: Position,
    pub offset: usize,
}

impl Location {
    /// Resolves a char offset.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the offset is past the end of the buffer.
    pub fn at(buffer: &TextBuffer, offset: usize) -> Result<Self> {
        Ok(Self {
            position: char_to_pos(buffer, offset)?,
            offset,
        })
    }
}

/// The selection of a document: an anchor and a caret, as char offsets.
///
/// `anchor == caret` is a plain caret with nothing selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Fixed end of the selection.
    pub anchor: usize,
    /// Moving end of the selection.
    pub caret: usize,
}

impl Cursor {
    /// Creates a cursor at offset 0 with no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// A collapsed cursor at `offset`.
    pub fn caret_at(offset: usize) -> Self {
        Self {
            anchor: offset,
            caret: offset,
        }
    }

    /// Selects `[start, start + length)`, leaving the caret at the end.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the range does not fit the buffer; the cursor
    /// is left unchanged.
    pub fn select(&mut self, buffer: &TextBuffer, start: usize, length: usize) -> Result<()> {
        let end = start
            .checked_add(length)
            .ok_or_else(|| out_of_range("selection end", usize::MAX, buffer.len_chars()))?;
        if end > buffer.len_chars() {
            return Err(out_of_range("selection end", end, buffer.len_chars()));
        }
        self.anchor = start;
        self.caret = end;
        Ok(())
    }

    /// Ordered `(start, end)` char offsets of the selection.
    pub fn range(&self) -> (usize, usize) {
        (self.anchor.min(self.caret), self.anchor.max(self.caret))
    }

    /// Number of selected chars.
    pub fn len(&self) -> usize {
        let (start, end) = self.range();
        end - start
    }

    /// True if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.caret
    }

    /// Returns the selected text (empty when nothing is selected).
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the selection no longer fits the buffer.
    pub fn selected_text(&self, buffer: &TextBuffer) -> Result<String> {
        let (start, end) = self.range();
        Ok(buffer.slice(start, end)?.to_string())
    }

    /// Pulls both ends back inside the buffer after its length changed.
    pub fn clamp_to(&mut self, buffer: &TextBuffer) {
        let len = buffer.len_chars();
        self.anchor = self.anchor.min(len);
        self.caret = self.caret.min(len);
    }

    /// Returns the identifier under or just before the caret.
    ///
    /// An identifier is a run of alphanumeric chars or `_`. Returns an empty
    /// string when the caret touches none.
    pub fn symbol(&self, buffer: &TextBuffer) -> String {
        let total = buffer.len_chars();
        let caret = self.caret.min(total);

        let at = |idx: usize| buffer.char_at(idx).map(is_word_char).unwrap_or(false);
        let seed = if caret < total && at(caret) {
            caret
        } else if caret > 0 && at(caret - 1) {
            caret - 1
        } else {
            return String::new();
        };

        let mut start = seed;
        while start > 0 && at(start - 1) {
            start -= 1;
        }
        let mut end = seed + 1;
        while end < total && at(end) {
            end += 1;
        }

        buffer
            .slice(start, end)
            .map(|s| s.to_string())
            .unwrap_or_default()
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Converts a `Position` to a char offset.
///
/// The column may point at any char of the line, including its line break;
/// on the last line it may also point one past the final char.
///
/// # Errors
///
/// Returns `OutOfRange` if the line or column does not exist.
pub fn pos_to_char(buffer: &TextBuffer, pos: Position) -> Result<usize> {
    let (start, end) = buffer.line_char_range(pos.line)?;
    let is_last = pos.line + 1 == buffer.len_lines();
    let limit = if is_last { end - start } else { (end - start).saturating_sub(1) };
    if pos.col > limit {
        return Err(out_of_range("column", pos.col, limit));
    }
    Ok(start + pos.col)
}

/// Converts a char offset to a `Position`.
///
/// # Errors
///
/// Returns `OutOfRange` if the offset is past the end of the buffer.
pub fn char_to_pos(buffer: &TextBuffer, char_idx: usize) -> Result<Position> {
    let line = buffer.char_to_line(char_idx)?;
    let line_start = buffer.line_to_char(line)?;
    Ok(Position::new(line, char_idx - line_start))
}
