/// Text buffer wrapping `ropey::Rope`; the rope keeps the line table in sync
/// with every mutation, so offset/line translation is always current.
///
/// Ropey is built without `unicode_lines`/`cr_lines`, so `\n` is the only
/// line break.
use std::fmt;

use anyhow::Result;
use ropey::Rope;

/// An index or offset fell outside the valid bounds of the buffer.
///
/// Returned inside `anyhow::Error` by every bounds-checked accessor; callers
/// that need to classify failures can `downcast_ref::<OutOfRange>()`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{what} {index} out of bounds (limit {limit})")]
pub struct OutOfRange {
    /// What kind of index was rejected ("line index", "char index", ...).
    pub what: &'static str,
    /// The rejected value.
    pub index: usize,
    /// The exclusive (or inclusive, for end offsets) bound it was checked against.
    pub limit: usize,
}

impl OutOfRange {
    pub fn new(what: &'static str, index: usize, limit: usize) -> Self {
        Self { what, index, limit }
    }
}

/// Shorthand for building an `OutOfRange` wrapped in `anyhow::Error`.
pub(crate) fn out_of_range(what: &'static str, index: usize, limit: usize) -> anyhow::Error {
    OutOfRange::new(what, index, limit).into()
}

/// A text buffer backed by a rope data structure for efficient editing.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl TextBuffer {
    /// Creates an empty text buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Returns the underlying rope (read-only).
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Returns the total number of characters in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the total number of bytes in the buffer.
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Returns the number of lines in the buffer. Always at least 1.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the text of a line (0-indexed), including any trailing newline.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the line index is not a valid line.
    pub fn line(&self, line_idx: usize) -> Result<ropey::RopeSlice<'_>> {
        self.check_line(line_idx)?;
        Ok(self.rope.line(line_idx))
    }

    /// Returns the char index of the start of a line.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the line index is not a valid line.
    pub fn line_to_char(&self, line_idx: usize) -> Result<usize> {
        self.check_line(line_idx)?;
        Ok(self.rope.line_to_char(line_idx))
    }

    /// Returns the char range `[start, end)` covered by a line, terminator included.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the line index is not a valid line.
    pub fn line_char_range(&self, line_idx: usize) -> Result<(usize, usize)> {
        let start = self.line_to_char(line_idx)?;
        Ok((start, start + self.rope.line(line_idx).len_chars()))
    }

    /// Returns the line index containing a char index.
    ///
    /// `char_idx == len_chars()` is accepted and maps to the last line.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the char index is past the end.
    pub fn char_to_line(&self, char_idx: usize) -> Result<usize> {
        self.check_offset(char_idx)?;
        Ok(self.rope.char_to_line(char_idx))
    }

    /// Returns the character at a given char index.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if there is no character at that index.
    pub fn char_at(&self, char_idx: usize) -> Result<char> {
        if char_idx >= self.rope.len_chars() {
            return Err(out_of_range("char index", char_idx, self.rope.len_chars()));
        }
        Ok(self.rope.char(char_idx))
    }

    /// Inserts text at the given char index.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the index is past the end.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> Result<()> {
        self.check_offset(char_idx)?;
        self.rope.insert(char_idx, text);
        Ok(())
    }

    /// Removes the char range `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the range is inverted or past the end.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end)?;
        self.rope.remove(start..end);
        Ok(())
    }

    /// Returns a slice of text in the char range `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the range is inverted or past the end.
    pub fn slice(&self, start: usize, end: usize) -> Result<ropey::RopeSlice<'_>> {
        self.check_range(start, end)?;
        Ok(self.rope.slice(start..end))
    }

    /// Replaces the char range `[start, end)` with `text`.
    ///
    /// The range is validated before anything is removed, so a failed call
    /// leaves the buffer untouched.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the range is inverted or past the end.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<()> {
        self.check_range(start, end)?;
        self.rope.remove(start..end);
        self.rope.insert(start, text);
        Ok(())
    }

    fn check_line(&self, line_idx: usize) -> Result<()> {
        if line_idx >= self.rope.len_lines() {
            return Err(out_of_range("line index", line_idx, self.rope.len_lines()));
        }
        Ok(())
    }

    fn check_offset(&self, char_idx: usize) -> Result<()> {
        if char_idx > self.rope.len_chars() {
            return Err(out_of_range("char index", char_idx, self.rope.len_chars()));
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start > end {
            return Err(out_of_range("range start", start, end));
        }
        if end > self.rope.len_chars() {
            return Err(out_of_range("range end", end, self.rope.len_chars()));
        }
        Ok(())
    }
}
