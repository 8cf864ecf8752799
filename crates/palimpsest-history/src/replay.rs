//! Snapshot replay: reconstructing document states from the operation log.
//!
//! The replayer applies operations in log order to an initially empty
//! document, validating each one against the current state. Strict
//! validation protects the merge engine from a fabricated timeline that
//! would desynchronize offsets downstream: a single out-of-range or
//! mismatched operation aborts the whole pipeline.

use tracing::debug;

use palimpsest_types::{EditOp, Mutation};

use crate::{HistoryError, ReplayErrorKind, Result};

/// In-memory document being rebuilt from an operation log.
///
/// Mutations address character offsets; the byte arithmetic lives here.
/// Snapshots are taken by cloning the current text; callers only need
/// them at chunk boundaries, never per operation.
#[derive(Clone, Debug, Default)]
pub struct Document {
    text: String,
    /// Character count of `text`, cached so bounds checks are O(1).
    char_len: usize,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current length in characters.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Consume the document, returning its text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// Byte index of character `offset`; the end of the string when
    /// `offset == char_len`.
    fn byte_at(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Apply one mutation, validating it against the current state.
    pub fn apply(&mut self, mutation: &Mutation) -> std::result::Result<(), ReplayErrorKind> {
        match mutation {
            Mutation::Insert { offset, text } => {
                if *offset > self.char_len {
                    return Err(ReplayErrorKind::InsertOutOfBounds);
                }
                let at = self.byte_at(*offset);
                self.text.insert_str(at, text);
                self.char_len += text.chars().count();
            }
            Mutation::Delete { offset, text } => {
                let len = text.chars().count();
                // checked: offset can be arbitrarily large in a corrupt log
                let end = offset
                    .checked_add(len)
                    .ok_or(ReplayErrorKind::DeleteOutOfBounds)?;
                if end > self.char_len {
                    return Err(ReplayErrorKind::DeleteOutOfBounds);
                }
                let start = self.byte_at(*offset);
                let end = self.byte_at(end);
                if &self.text[start..end] != text {
                    return Err(ReplayErrorKind::DeleteMismatch);
                }
                self.text.replace_range(start..end, "");
                self.char_len -= len;
            }
        }
        Ok(())
    }
}

/// Replay the full log from the empty document and return the final
/// snapshot text.
pub fn replay_text(ops: &[EditOp]) -> Result<String> {
    let mut doc = Document::new();
    for (op_index, op) in ops.iter().enumerate() {
        doc.apply(&op.mutation)
            .map_err(|reason| HistoryError::Replay { op_index, reason })?;
    }
    debug!(ops = ops.len(), chars = doc.char_len(), "replayed operation log");
    Ok(doc.into_text())
}

/// The log prefix at or before `cutoff`.
///
/// Logs are monotonically non-decreasing in timestamp, so the prefix is
/// found by partition point. Used to render a session as of a historical
/// moment.
pub fn ops_until(ops: &[EditOp], cutoff: u64) -> &[EditOp] {
    let end = ops.partition_point(|op| op.timestamp <= cutoff);
    &ops[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_insert_and_delete() {
        let ops = vec![
            EditOp::insert(0, 0, "hello world"),
            EditOp::delete(10, 1, "ello"),
            EditOp::insert(20, 1, "i"),
        ];
        assert_eq!(replay_text(&ops).unwrap(), "hi world");
    }

    #[test]
    fn test_replay_empty_log() {
        assert_eq!(replay_text(&[]).unwrap(), "");
    }

    #[test]
    fn test_replay_multibyte_offsets() {
        let ops = vec![
            EditOp::insert(0, 0, "héllo"),
            EditOp::insert(10, 5, "!"),
            EditOp::delete(20, 1, "é"),
        ];
        assert_eq!(replay_text(&ops).unwrap(), "hllo!");
    }

    #[test]
    fn test_insert_out_of_bounds() {
        let ops = vec![EditOp::insert(0, 0, "abc"), EditOp::insert(10, 4, "x")];
        assert_eq!(
            replay_text(&ops).unwrap_err(),
            HistoryError::Replay {
                op_index: 1,
                reason: ReplayErrorKind::InsertOutOfBounds,
            }
        );
    }

    #[test]
    fn test_delete_out_of_bounds() {
        // delete at offset 5 on a 3-char document
        let ops = vec![EditOp::insert(0, 0, "abc"), EditOp::delete(10, 5, "x")];
        assert_eq!(
            replay_text(&ops).unwrap_err(),
            HistoryError::Replay {
                op_index: 1,
                reason: ReplayErrorKind::DeleteOutOfBounds,
            }
        );
    }

    #[test]
    fn test_delete_offset_overflow_is_out_of_bounds() {
        // offset + len would wrap; must report bounds, not panic
        let ops = vec![
            EditOp::insert(0, 0, "abc"),
            EditOp::delete(10, usize::MAX, "x"),
        ];
        assert_eq!(
            replay_text(&ops).unwrap_err(),
            HistoryError::Replay {
                op_index: 1,
                reason: ReplayErrorKind::DeleteOutOfBounds,
            }
        );
    }

    #[test]
    fn test_delete_text_mismatch() {
        let ops = vec![EditOp::insert(0, 0, "abc"), EditOp::delete(10, 0, "x")];
        assert_eq!(
            replay_text(&ops).unwrap_err(),
            HistoryError::Replay {
                op_index: 1,
                reason: ReplayErrorKind::DeleteMismatch,
            }
        );
    }

    #[test]
    fn test_ops_until_cutoff() {
        let ops = vec![
            EditOp::insert(0, 0, "a"),
            EditOp::insert(100, 1, "b"),
            EditOp::insert(200, 2, "c"),
        ];
        assert_eq!(ops_until(&ops, 100).len(), 2);
        assert_eq!(ops_until(&ops, 99).len(), 1);
        assert_eq!(ops_until(&ops, 500).len(), 3);
    }
}
