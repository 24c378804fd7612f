//! Core editing model: rope-backed text buffer, selection, viewport, file
//! encoding, and the `Document` that records every edit for undo/redo.
pub mod buffer;
pub mod cursor;
pub mod document;
pub mod encoding;
pub mod history;
pub mod viewport;

pub use buffer::{OutOfRange, TextBuffer};
pub use cursor::{char_to_pos, pos_to_char, Cursor, Location, Position};
pub use document::{Document, DocumentInfo, DocumentOptions, DEFAULT_VIEWPORT_LINES};
pub use encoding::{FileEncoding, LineEnding};
pub use history::{HistoryConfig, HistoryState};
pub use viewport::{ScrollPosition, Viewport, VisibleLines};
