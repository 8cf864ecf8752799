//! Session-history diff pipeline for Palimpsest.
//!
//! Reconstructs, from a time-ordered log of fine-grained text edits, a
//! single provenance-tagged diff showing how a document evolved across an
//! editing session: which spans are pre-session baseline, which were added
//! later, and which were deleted, even when those spans interleave across
//! many intermediate snapshots.
//!
//! # Pipeline
//!
//! Data flows strictly forward, each stage pure and in-memory:
//!
//! ```text
//! operation log
//!     → replay      (validate + reconstruct snapshots)
//!     → chunk       (split on inactivity gaps, baseline/final per chunk)
//!     → line diff   (LCS line diff per chunk, via `similar`)
//!     → merge       (fold diffs into one offset-consistent span sequence)
//! ```
//!
//! The merge is the centerpiece: later chunks' diffs are expressed against
//! their own final text, so every span has to be translated through a
//! cursor into the accumulated structure, skipping text earlier chunks
//! already deleted. See [`merge_diffs`].
//!
//! # Example
//!
//! ```
//! use palimpsest_history::{ChunkConfig, EditOp, compute_merged_diff, final_text};
//!
//! let ops = vec![
//!     EditOp::insert(0, 0, "a"),
//!     EditOp::insert(5, 1, "b"),
//!     EditOp::insert(20_000, 2, "c"),
//! ];
//! let merged = compute_merged_diff(&ops, &ChunkConfig::default()).unwrap();
//! assert_eq!(final_text(&merged), "abc");
//! ```

mod chunk;
mod error;
mod linediff;
mod merge;
mod replay;

pub use chunk::{Chunk, ChunkConfig, split_chunks};
pub use error::{HistoryError, ReplayErrorKind};
pub use linediff::compute_line_diff;
pub use merge::merge_diffs;
pub use replay::{Document, ops_until, replay_text};

// Re-export the wire types so pipeline callers need only this crate.
pub use palimpsest_types::{
    Diff, DiffSpan, EditOp, MergedDiff, Mutation, SpanKind, baseline_text, final_text,
};

use tracing::debug;

/// Result type for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Compute the provenance-tagged merged diff for a whole session.
///
/// Replays the operation log, splits it into inactivity-bounded chunks,
/// diffs each chunk against its baseline, and folds the diffs into one
/// [`MergedDiff`]. Built once per request and discarded; the function is
/// pure and deterministic, so identical inputs always yield byte-identical
/// output.
///
/// To render a historical moment instead of the full session, pass the
/// prefix from [`ops_until`].
///
/// # Errors
///
/// [`HistoryError::Replay`] if any operation is inconsistent with the
/// document state it applies to; [`HistoryError::MergeInconsistency`] if a
/// chunk diff disagrees with the accumulated merge (a defect signal, never
/// expected in practice). No partial output is returned on failure.
pub fn compute_merged_diff(ops: &[EditOp], config: &ChunkConfig) -> Result<MergedDiff> {
    let chunks = split_chunks(ops, config)?;
    let diffs: Vec<Diff> = chunks.iter().map(linediff::chunk_diff).collect();
    let merged = merge_diffs(&diffs)?;
    debug!(
        ops = ops.len(),
        chunks = chunks.len(),
        spans = merged.len(),
        "computed merged session diff"
    );
    Ok(merged)
}
