//! Undo/redo history built from explicit edit operations.
//!
//! Every mutation of a document is described by an `EditOperation` that
//! knows how to apply and revert itself against any `EditTarget`. The
//! `UndoManager` keeps those operations on linear undo/redo stacks and
//! tracks the save point used to answer "is this document modified?".
pub mod config;
pub mod manager;
pub mod operation;

pub use config::HistoryConfig;
pub use manager::{HistoryState, UndoManager};
pub use operation::{EditOperation, EditTarget, SelectionSnapshot};
