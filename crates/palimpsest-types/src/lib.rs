//! Shared operation and span types for Palimpsest.
//!
//! This crate is the wire-contract foundation: timestamped edit operations
//! and provenance-tagged diff spans. It has **no internal palimpsest
//! dependencies**: a pure leaf crate that the pipeline builds on.
//!
//! # Data Flow Overview
//!
//! ```text
//! [EditOp]  ← append-only log of one document's edit history
//!     └── replayed into snapshots (palimpsest-history)
//!     └── split into time-bounded chunks
//!
//! [DiffSpan]  ← maximal run of text with uniform provenance
//!     └── Diff: spans for one chunk, against that chunk's baseline
//!     └── MergedDiff: cumulative spans for the whole session
//!     └── serializes to `{value, added, removed, original}` records
//! ```
//!
//! # Key Types
//!
//! | Type           | Purpose                                        |
//! |----------------|------------------------------------------------|
//! | [`EditOp`]     | One timestamped insert or delete               |
//! | [`Mutation`]   | The edit itself, addressed by char offset      |
//! | [`SpanKind`]   | Equal / Added / Removed provenance             |
//! | [`DiffSpan`]   | Text run with kind + original flag             |
//! | [`Diff`]       | Ordered spans for one chunk                    |
//! | [`MergedDiff`] | Ordered spans for the accumulated session      |

pub mod op;
pub mod span;

// Re-export primary types at crate root for convenience.
pub use op::{EditOp, Mutation};
pub use span::{Diff, DiffSpan, MergedDiff, SpanKind, baseline_text, final_text};
