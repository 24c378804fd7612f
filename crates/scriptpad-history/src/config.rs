//! Configuration for the history system.

/// Maximum number of edit operations kept per document.
/// Oldest operations are evicted when this limit is exceeded.
const DEFAULT_MAX_HISTORY_DEPTH: usize = 10_000;

/// Lower bound applied by [`HistoryConfig::sanitized`].
const MIN_HISTORY_DEPTH: usize = 1;

/// Configuration for an `UndoManager`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Max operations on the undo stack.
    pub max_history_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history_depth: DEFAULT_MAX_HISTORY_DEPTH,
        }
    }
}

impl HistoryConfig {
    /// Creates a config with the given depth limit.
    pub fn with_depth(max_history_depth: usize) -> Self {
        Self { max_history_depth }.sanitized()
    }

    /// Returns a copy with the depth clamped to at least one operation.
    pub fn sanitized(mut self) -> Self {
        self.max_history_depth = self.max_history_depth.max(MIN_HISTORY_DEPTH);
        self
    }
}
