//! Line-level comparison of original and optimized code.
//!
//! Text flows through the engine as: fence stripping (generator output
//! only), HTML escaping, line splitting and normalization, alignment, and
//! finally row rendering. Every stage is a pure function of its input.

pub mod align;
mod escape;
mod fence;
mod html;
mod normalize;
mod render;

pub use align::{AlignmentOp, MatchingBlock, OpTag, SequenceMatcher, align};
pub use escape::escape_html;
pub use fence::strip_fence;
pub use html::{NO_CHANGES_LABEL, render_html};
pub use normalize::{NormalizedLine, SourceText, normalize_lines};
pub use render::{
    AnnotatedRow, CellClass, LineMarker, RenderedDiff, RowKind, align_and_render, diff_texts,
    render_rows,
};
