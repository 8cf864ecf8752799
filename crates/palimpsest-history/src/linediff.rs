//! Line-level diffing between two snapshots.
//!
//! A thin wrapper over `similar`'s LCS line diff. The unit of comparison is
//! a line including its terminator, so concatenating span texts reproduces
//! the inputs byte for byte: Equal+Removed spans rebuild the baseline,
//! Equal+Added spans rebuild the final text. Tie-breaking inside `similar`
//! is deterministic, which the merge engine depends on.

use similar::{ChangeTag, TextDiff};

use palimpsest_types::{Diff, DiffSpan, SpanKind};

use crate::chunk::Chunk;

/// Compute a line-level diff between a baseline and a final text.
///
/// Spans are maximal runs: consecutive lines with the same tag coalesce
/// into one span. Within a replaced region, Removed lines precede Added
/// lines. Identical inputs yield a single Equal span; two empty inputs
/// yield no spans at all.
pub fn compute_line_diff(baseline: &str, final_text: &str) -> Diff {
    diff_lines(baseline, final_text, false)
}

/// Diff a chunk against its own baseline.
///
/// The first chunk is diffed against itself: an all-Equal diff whose spans
/// carry the `original` flag, giving the merge a well-defined starting
/// point that represents pre-session content.
pub(crate) fn chunk_diff(chunk: &Chunk) -> Diff {
    if chunk.original {
        diff_lines(&chunk.final_text, &chunk.final_text, true)
    } else {
        diff_lines(&chunk.baseline, &chunk.final_text, false)
    }
}

fn diff_lines(baseline: &str, final_text: &str, original: bool) -> Diff {
    let diff = TextDiff::from_lines(baseline, final_text);
    let mut spans: Diff = Vec::new();

    for change in diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => SpanKind::Equal,
            ChangeTag::Insert => SpanKind::Added,
            ChangeTag::Delete => SpanKind::Removed,
        };
        let value = change.value();
        if value.is_empty() {
            continue;
        }
        match spans.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(value),
            _ => spans.push(DiffSpan {
                text: value.to_string(),
                kind,
                original,
            }),
        }
    }

    spans
}
