//! Viewport tracking for a document.
//!
//! The [`Viewport`] keeps the first visible line and the visible height.
//! Everything reported to clients is 1-indexed.

/// Visible line range, 1-indexed and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleLines {
    pub first_line: usize,
    pub last_line: usize,
}

/// Current scroll state, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    pub x_offset: usize,
    pub first_visible_line: usize,
}

/// Manages the visible portion of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    height: usize,
    /// 0-indexed first visible line.
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// Creates a viewport showing `height` lines of a `total_lines` document.
    ///
    /// Both values are raised to at least 1.
    pub fn new(height: usize, total_lines: usize) -> Self {
        Self {
            height: height.max(1),
            offset: 0,
            total_lines: total_lines.max(1),
        }
    }

    /// Get the visible height in lines.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Get the total number of lines in the document.
    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Get the visible line range.
    pub fn visible_lines(&self) -> VisibleLines {
        let first_line = self.offset + 1;
        let last_line = (self.offset + self.height).min(self.total_lines);
        VisibleLines {
            first_line,
            last_line,
        }
    }

    /// Get the scroll position.
    pub fn scroll_position(&self) -> ScrollPosition {
        ScrollPosition {
            // Lines are never clipped horizontally.
            x_offset: 0,
            first_visible_line: self.offset + 1,
        }
    }

    /// Scrolls so that 1-indexed `line` is the first visible line.
    ///
    /// The value is clamped to `[1, total_lines]`.
    pub fn scroll_to_line(&mut self, line: usize) {
        self.offset = line.clamp(1, self.total_lines) - 1;
    }

    /// Updates the document length, re-clamping the scroll offset.
    pub fn set_total_lines(&mut self, total_lines: usize) {
        self.total_lines = total_lines.max(1);
        if self.offset >= self.total_lines {
            self.offset = self.total_lines - 1;
        }
    }
}
