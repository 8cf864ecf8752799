//! Error types for the history pipeline.

use thiserror::Error;

/// Why the replayer rejected an operation.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayErrorKind {
    /// Insert offset past the end of the document.
    #[error("insert offset out of bounds")]
    InsertOutOfBounds,
    /// Delete range extends past the end of the document.
    #[error("delete range out of bounds")]
    DeleteOutOfBounds,
    /// Text in the document differs from the text the delete claims to
    /// remove. A corrupted or reordered log, never a user error.
    #[error("deleted text does not match document")]
    DeleteMismatch,
}

/// Errors that can occur while computing a session diff.
///
/// Every failure here is terminal for the request: inputs and computation
/// are fully deterministic, so a retry without new input reproduces the
/// identical error. Nothing is retried internally and no partial merged
/// output is ever returned.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HistoryError {
    /// An operation is inconsistent with the document state at the time it
    /// would be applied. Reported with the index of the failing operation.
    #[error("operation {op_index} cannot be applied: {reason}")]
    Replay {
        op_index: usize,
        reason: ReplayErrorKind,
    },

    /// A per-chunk diff's implied baseline length disagrees with the merge
    /// cursor's view of the accumulated diff. Indicates a defect in
    /// chunking or differencing upstream of the merge.
    #[error(
        "chunk {chunk_index} diff claims a {claimed}-char baseline but {actual} chars are visible"
    )]
    MergeInconsistency {
        chunk_index: usize,
        claimed: usize,
        actual: usize,
    },
}
