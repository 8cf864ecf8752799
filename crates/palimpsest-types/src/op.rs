//! Edit operations: the replayable record of a document's history.
//!
//! An operation log is an append-only, timestamp-ordered sequence of
//! [`EditOp`]s describing every insert and delete made to one document.
//! Replaying the log from the empty document reproduces every intermediate
//! state of the editing session.
//!
//! Operations are designed to be:
//! - **Deterministic**: replaying the same log always yields the same text
//! - **Serializable**: logs arrive over the wire from the edit-history store
//! - **Self-checking**: deletes carry the removed text, not just a length

use serde::{Deserialize, Serialize};

/// A single edit to the document, addressed by character offset.
///
/// Offsets count characters, not bytes; the edit-history store indexes
/// positions the way an editor buffer does. Byte arithmetic is an
/// implementation detail of the replayer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// Insert `text` so that it begins at character `offset`.
    Insert {
        /// Character position of the insertion point, `0 ..= doc_len`.
        offset: usize,
        /// Text to insert.
        text: String,
    },

    /// Delete `text` starting at character `offset`.
    ///
    /// Carrying the deleted text rather than a length lets the replayer
    /// verify the log against the reconstructed document. A mismatch is a
    /// corruption signal, never silently ignored.
    Delete {
        /// Character position of the first deleted character.
        offset: usize,
        /// Exact text being removed.
        text: String,
    },
}

impl Mutation {
    /// The character offset this mutation applies at.
    pub fn offset(&self) -> usize {
        match self {
            Mutation::Insert { offset, .. } => *offset,
            Mutation::Delete { offset, .. } => *offset,
        }
    }

    /// The text this mutation inserts or removes.
    pub fn text(&self) -> &str {
        match self {
            Mutation::Insert { text, .. } => text,
            Mutation::Delete { text, .. } => text,
        }
    }

    /// Number of characters this mutation inserts or removes.
    pub fn char_len(&self) -> usize {
        self.text().chars().count()
    }

    /// Check if this mutation inserts text.
    pub fn is_insert(&self) -> bool {
        matches!(self, Mutation::Insert { .. })
    }

    /// Check if this mutation removes text.
    pub fn is_delete(&self) -> bool {
        matches!(self, Mutation::Delete { .. })
    }
}

/// A timestamped edit operation.
///
/// Timestamps are Unix milliseconds in the original deployment, but any unit
/// works as long as the chunking threshold uses the same one. Logs must be
/// monotonically non-decreasing in `timestamp`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOp {
    /// When the edit happened.
    pub timestamp: u64,
    /// The edit itself.
    pub mutation: Mutation,
}

impl EditOp {
    /// Convenience constructor for an insert operation.
    pub fn insert(timestamp: u64, offset: usize, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            mutation: Mutation::Insert {
                offset,
                text: text.into(),
            },
        }
    }

    /// Convenience constructor for a delete operation.
    pub fn delete(timestamp: u64, offset: usize, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            mutation: Mutation::Delete {
                offset,
                text: text.into(),
            },
        }
    }
}
