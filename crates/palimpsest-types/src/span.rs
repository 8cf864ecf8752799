//! Diff spans: provenance-tagged runs of text.
//!
//! A span is a maximal run of text with uniform provenance. A [`Diff`] is an
//! ordered sequence of spans such that concatenating the Equal+Removed texts
//! reproduces the baseline and concatenating the Equal+Added texts
//! reproduces the final text. A [`MergedDiff`] has the same shape but
//! accumulates every chunk of a session.
//!
//! On the wire a span is the jsdiff-compatible record
//! `{ "value": .., "added": bool, "removed": bool, "original": bool }`;
//! the JSON contract any rendering layer consumes.

use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::EnumString;

/// How a run of text relates to the diff's baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SpanKind {
    /// Present in both the baseline and the final text.
    #[default]
    Equal,
    /// Present only in the final text.
    Added,
    /// Present only in the baseline.
    Removed,
}

impl SpanKind {
    /// Stable lowercase name, matching the strum parse forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Equal => "equal",
            SpanKind::Added => "added",
            SpanKind::Removed => "removed",
        }
    }
}

impl std::fmt::Display for SpanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A maximal run of text with uniform provenance within a diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffSpan {
    /// The span's text.
    pub text: String,
    /// Equal, Added, or Removed.
    pub kind: SpanKind,
    /// True for spans belonging to the degenerate first chunk: content
    /// present before the session's first pause. Orthogonal to `kind`:
    /// a styling hint for downstream renderers, never merge logic.
    pub original: bool,
}

impl DiffSpan {
    /// An Equal span with `original` unset.
    pub fn equal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SpanKind::Equal,
            original: false,
        }
    }

    /// An Added span with `original` unset.
    pub fn added(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SpanKind::Added,
            original: false,
        }
    }

    /// A Removed span with `original` unset.
    pub fn removed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SpanKind::Removed,
            original: false,
        }
    }

    /// Length of the span text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if this span was deleted at some point in the session.
    pub fn is_removed(&self) -> bool {
        self.kind == SpanKind::Removed
    }

    /// Check if this span is part of the surviving (final) text.
    pub fn is_visible(&self) -> bool {
        self.kind != SpanKind::Removed
    }
}

impl Serialize for DiffSpan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DiffSpan", 4)?;
        s.serialize_field("value", &self.text)?;
        s.serialize_field("added", &(self.kind == SpanKind::Added))?;
        s.serialize_field("removed", &(self.kind == SpanKind::Removed))?;
        s.serialize_field("original", &self.original)?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for DiffSpan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Wire {
            value: String,
            #[serde(default)]
            added: bool,
            #[serde(default)]
            removed: bool,
            #[serde(default)]
            original: bool,
        }

        let wire = Wire::deserialize(deserializer)?;
        let kind = match (wire.added, wire.removed) {
            (false, false) => SpanKind::Equal,
            (true, false) => SpanKind::Added,
            (false, true) => SpanKind::Removed,
            (true, true) => {
                return Err(D::Error::custom("span cannot be both added and removed"));
            }
        };
        Ok(DiffSpan {
            text: wire.value,
            kind,
            original: wire.original,
        })
    }
}

/// An ordered span sequence for one chunk, against that chunk's baseline.
pub type Diff = Vec<DiffSpan>;

/// The cumulative, provenance-tagged span sequence for a whole session.
pub type MergedDiff = Vec<DiffSpan>;

/// Concatenate the Equal+Removed span texts: the baseline this diff was
/// computed against.
pub fn baseline_text(spans: &[DiffSpan]) -> String {
    spans
        .iter()
        .filter(|s| s.kind != SpanKind::Added)
        .map(|s| s.text.as_str())
        .collect()
}

/// Concatenate the Equal+Added span texts: the final text this diff
/// produces. For a [`MergedDiff`] this is the session's final snapshot.
pub fn final_text(spans: &[DiffSpan]) -> String {
    spans
        .iter()
        .filter(|s| s.is_visible())
        .map(|s| s.text.as_str())
        .collect()
}
