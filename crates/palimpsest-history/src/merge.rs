//! Folding per-chunk diffs into one provenance-tagged merged diff.
//!
//! Each later chunk's diff is expressed against that chunk's own final
//! text, which is exactly the subsequence of non-Removed spans in the
//! merged structure built so far. The merge therefore carries a cursor that
//! translates the chunk's local offsets into positions between merged
//! spans, skipping text already marked Removed by earlier folds. Removed
//! text is absent from the later chunk's view entirely.
//!
//! All three per-span fold rules are built from four cursor primitives
//! (`skip_removed`, `advance`, `insert`, `mark_removed`) so the offset
//! arithmetic lives in one place. Invariant: the cursor rests on a span
//! boundary after every primitive; `advance` and `mark_removed` split the
//! landing span to keep it there.

use tracing::warn;

use palimpsest_types::{Diff, DiffSpan, MergedDiff, SpanKind};

use crate::{HistoryError, Result};

/// The merged diff being built, plus the cursor into it.
struct MergeState {
    spans: Vec<DiffSpan>,
    /// Index of the span the cursor sits in front of; `spans.len()` means
    /// end of document.
    cursor: usize,
}

impl MergeState {
    fn new(first: Diff) -> Self {
        Self {
            spans: first,
            cursor: 0,
        }
    }

    /// Total characters visible (non-Removed) in the merged structure.
    fn visible_len(&self) -> usize {
        self.spans
            .iter()
            .filter(|s| s.is_visible())
            .map(DiffSpan::char_len)
            .sum()
    }

    /// Move the cursor past contiguous Removed spans.
    fn skip_removed(&mut self) {
        while self
            .spans
            .get(self.cursor)
            .is_some_and(DiffSpan::is_removed)
        {
            self.cursor += 1;
        }
    }

    /// Split the span at `idx` after its first `chars` characters, both
    /// halves keeping the span's kind and original flag. No-op when the
    /// split would produce an empty half; zero-length spans are never
    /// emitted.
    fn split_at(&mut self, idx: usize, chars: usize) {
        let len = self.spans[idx].char_len();
        if chars == 0 || chars >= len {
            return;
        }
        let byte = byte_offset(&self.spans[idx].text, chars);
        let tail = self.spans[idx].text.split_off(byte);
        let (kind, original) = (self.spans[idx].kind, self.spans[idx].original);
        self.spans.insert(
            idx + 1,
            DiffSpan {
                text: tail,
                kind,
                original,
            },
        );
    }

    /// Advance the cursor `n` visible characters. Removed spans contribute
    /// nothing to the advance; a span the advance ends inside is split so
    /// the cursor lands on a boundary.
    fn advance(&mut self, mut n: usize) {
        while n > 0 {
            self.skip_removed();
            debug_assert!(self.cursor < self.spans.len(), "advance past end of merged diff");
            let Some(span) = self.spans.get(self.cursor) else {
                return;
            };
            let len = span.char_len();
            if n >= len {
                n -= len;
            } else {
                self.split_at(self.cursor, n);
                n = 0;
            }
            self.cursor += 1;
        }
    }

    /// Splice an Added span at the cursor, leaving the cursor just after it.
    ///
    /// A cursor sitting at the start of Removed spans first skips past
    /// them: a later insertion at a position previously occupied by
    /// now-deleted text displays after the deletion marker, not
    /// interleaved inside it. A cursor at end of document appends.
    fn insert(&mut self, span: DiffSpan) {
        self.skip_removed();
        self.spans.insert(self.cursor, span);
        self.cursor += 1;
    }

    /// Mark the next `n` visible characters as Removed, splitting partially
    /// covered spans at both ends. Already-Removed spans are skipped and do
    /// not count toward `n`: they are not part of the folding chunk's view
    /// and cannot be re-deleted. The cursor ends at the start of the first
    /// unaffected span.
    fn mark_removed(&mut self, mut n: usize) {
        while n > 0 {
            self.skip_removed();
            debug_assert!(self.cursor < self.spans.len(), "remove past end of merged diff");
            let Some(span) = self.spans.get(self.cursor) else {
                return;
            };
            let len = span.char_len();
            if n < len {
                self.split_at(self.cursor, n);
            }
            self.spans[self.cursor].kind = SpanKind::Removed;
            n -= len.min(n);
            self.cursor += 1;
        }
    }
}

/// Byte index of character `chars` within `text`.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Fold an ordered list of per-chunk diffs into one merged diff.
///
/// The merge starts from a copy of the first diff and folds each later
/// diff span by span. Concatenating the result's non-Removed spans
/// reproduces the final text of the last chunk; Removed spans stay
/// positioned exactly where they were deleted relative to surviving text.
///
/// Before folding a diff, its claimed baseline length (Equal+Removed
/// chars) is checked against the visible length of the merged structure.
/// A mismatch means chunking and differencing disagree; the fold fails
/// with [`HistoryError::MergeInconsistency`] rather than producing a
/// corrupted splice.
///
/// An empty diff list merges to an empty result. Identical inputs always
/// produce byte-identical output.
pub fn merge_diffs(diffs: &[Diff]) -> Result<MergedDiff> {
    let Some((first, rest)) = diffs.split_first() else {
        return Ok(Vec::new());
    };

    let mut state = MergeState::new(first.clone());
    for (i, diff) in rest.iter().enumerate() {
        let chunk_index = i + 1;
        let claimed: usize = diff
            .iter()
            .filter(|s| s.kind != SpanKind::Added)
            .map(DiffSpan::char_len)
            .sum();
        let actual = state.visible_len();
        if claimed != actual {
            warn!(chunk_index, claimed, actual, "chunk diff disagrees with merged view");
            return Err(HistoryError::MergeInconsistency {
                chunk_index,
                claimed,
                actual,
            });
        }

        state.cursor = 0;
        for span in diff {
            if span.text.is_empty() {
                continue;
            }
            match span.kind {
                SpanKind::Equal => state.advance(span.char_len()),
                SpanKind::Added => state.insert(span.clone()),
                SpanKind::Removed => state.mark_removed(span.char_len()),
            }
        }
    }

    Ok(state.spans)
}
