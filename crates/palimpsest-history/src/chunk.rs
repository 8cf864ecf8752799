//! Chunk splitting: partitioning the log into time-bounded segments.
//!
//! A chunk is a contiguous run of operations where consecutive timestamps
//! stay within an inactivity threshold. Each chunk reduces to one
//! baseline/final text pair; the per-chunk line diffs are what the merge
//! engine folds together.

use serde::{Deserialize, Serialize};
use tracing::debug;

use palimpsest_types::EditOp;

use crate::replay::Document;
use crate::{HistoryError, Result};

/// Configuration for chunk splitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Inactivity gap (same unit as op timestamps) that closes a chunk.
    /// A gap strictly greater than this is a breakpoint.
    pub threshold: u64,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self { threshold: 10_000 }
    }
}

/// A time-bounded segment of the session, reduced to one baseline/final
/// text pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Document text when the chunk opened.
    pub baseline: String,
    /// Document text when the chunk closed.
    pub final_text: String,
    /// True for the first chunk. Its content, everything typed before the
    /// session's first pause, is treated as pre-session baseline and
    /// diffed against itself, yielding the all-Equal "original" diff the
    /// merge starts from.
    pub original: bool,
}

/// Split the operation log into chunks.
///
/// The running document starts empty. A timestamp gap strictly greater
/// than the threshold closes the current chunk at the document state
/// *before* the gapped operation; that operation then belongs to the new
/// chunk (the breach is a breakpoint, not a queue drain). One trailing
/// chunk is closed after the last operation.
///
/// The first chunk is always emitted even though its diff has no
/// Added/Removed spans. Any later chunk with no net change is omitted;
/// a pure no-op period contributes nothing visually.
///
/// An empty log yields a single trivial chunk with empty baseline and
/// final text.
pub fn split_chunks(ops: &[EditOp], config: &ChunkConfig) -> Result<Vec<Chunk>> {
    if ops.is_empty() {
        return Ok(vec![Chunk {
            baseline: String::new(),
            final_text: String::new(),
            original: true,
        }]);
    }

    let mut doc = Document::new();
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut baseline = String::new();
    let mut last_ts = ops[0].timestamp;

    for (op_index, op) in ops.iter().enumerate() {
        if op.timestamp.saturating_sub(last_ts) > config.threshold {
            close_chunk(&mut chunks, &mut baseline, doc.text());
        }
        doc.apply(&op.mutation)
            .map_err(|reason| HistoryError::Replay { op_index, reason })?;
        last_ts = op.timestamp;
    }
    close_chunk(&mut chunks, &mut baseline, doc.text());

    debug!(
        ops = ops.len(),
        chunks = chunks.len(),
        threshold = config.threshold,
        "split operation log into chunks"
    );
    Ok(chunks)
}

/// Close the open chunk at `current` and re-open the baseline there.
fn close_chunk(chunks: &mut Vec<Chunk>, baseline: &mut String, current: &str) {
    let original = chunks.is_empty();
    if !original && baseline.as_str() == current {
        // no net change during this period
        return;
    }
    chunks.push(Chunk {
        baseline: std::mem::replace(baseline, current.to_string()),
        final_text: current.to_string(),
        original,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_boundary_scenario() {
        // gap 5 stays in chunk 0; gap 19995 opens chunk 1
        let ops = vec![
            EditOp::insert(0, 0, "a"),
            EditOp::insert(5, 1, "b"),
            EditOp::insert(20_000, 2, "c"),
        ];
        let chunks = split_chunks(&ops, &ChunkConfig::default()).unwrap();
        assert_eq!(chunks.len(), 2);

        assert_eq!(chunks[0].baseline, "");
        assert_eq!(chunks[0].final_text, "ab");
        assert!(chunks[0].original);

        assert_eq!(chunks[1].baseline, "ab");
        assert_eq!(chunks[1].final_text, "abc");
        assert!(!chunks[1].original);
    }

    #[test]
    fn test_gap_exactly_at_threshold_stays_in_chunk() {
        let ops = vec![
            EditOp::insert(0, 0, "a"),
            EditOp::insert(10_000, 1, "b"),
        ];
        let chunks = split_chunks(&ops, &ChunkConfig::default()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].final_text, "ab");
    }

    #[test]
    fn test_empty_log_single_trivial_chunk() {
        let chunks = split_chunks(&[], &ChunkConfig::default()).unwrap();
        assert_eq!(
            chunks,
            vec![Chunk {
                baseline: String::new(),
                final_text: String::new(),
                original: true,
            }]
        );
    }

    #[test]
    fn test_no_gaps_single_chunk() {
        // threshold larger than the whole session: one chunk, original
        let ops = vec![
            EditOp::insert(0, 0, "a"),
            EditOp::insert(1, 1, "b"),
            EditOp::insert(2, 2, "c"),
        ];
        let chunks = split_chunks(&ops, &ChunkConfig::default()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].original);
        assert_eq!(chunks[0].final_text, "abc");
    }

    #[test]
    fn test_no_op_chunk_omitted() {
        // chunk 1 inserts then deletes the same text: no net change
        let ops = vec![
            EditOp::insert(0, 0, "base"),
            EditOp::insert(20_000, 4, "x"),
            EditOp::delete(20_001, 4, "x"),
            EditOp::insert(40_000, 4, "!"),
        ];
        let chunks = split_chunks(&ops, &ChunkConfig::default()).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].final_text, "base");
        assert_eq!(chunks[1].baseline, "base");
        assert_eq!(chunks[1].final_text, "base!");
    }

    #[test]
    fn test_first_chunk_emitted_even_when_empty() {
        // delete everything typed before the first pause, then type again
        let ops = vec![
            EditOp::insert(0, 0, "x"),
            EditOp::delete(1, 0, "x"),
            EditOp::insert(20_000, 0, "y"),
        ];
        let chunks = split_chunks(&ops, &ChunkConfig::default()).unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].original);
        assert_eq!(chunks[0].final_text, "");
        assert_eq!(chunks[1].final_text, "y");
    }

    #[test]
    fn test_invalid_op_reports_index() {
        let ops = vec![
            EditOp::insert(0, 0, "abc"),
            EditOp::delete(20_000, 5, "x"),
        ];
        let err = split_chunks(&ops, &ChunkConfig::default()).unwrap_err();
        assert!(matches!(err, HistoryError::Replay { op_index: 1, .. }));
    }

    #[test]
    fn test_config_default_and_serde() {
        let config = ChunkConfig::default();
        assert_eq!(config.threshold, 10_000);

        let back: ChunkConfig = serde_json::from_str(r#"{"threshold":500}"#).unwrap();
        assert_eq!(back.threshold, 500);
    }
}
