//! Expansion of alignment ops into annotated side-by-side rows.

use std::fmt;

use serde::{Serialize, Serializer};

use super::align::{AlignmentOp, OpTag, align};
use super::escape::escape_html;
use super::normalize::{NormalizedLine, SourceText, normalize_lines};

/// Left-hand gutter label of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMarker {
    /// One-based line number in the original text.
    Line(usize),
    /// The row only exists in the optimized text.
    Inserted,
    /// No label; used by the no-changes row.
    Blank,
}

impl fmt::Display for LineMarker {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(number) => write!(formatter, "{number}"),
            Self::Inserted => formatter.write_str("+"),
            Self::Blank => Ok(()),
        }
    }
}

impl Serialize for LineMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Line(number) => number.serialize(serializer),
            Self::Inserted => serializer.serialize_str("+"),
            Self::Blank => serializer.serialize_str(""),
        }
    }
}

/// Presentation class of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    /// Unchanged content.
    Plain,
    /// Content present only in the optimized text.
    Added,
    /// Content present only in the original text.
    Removed,
}

/// Which kind of op produced a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Row from an equal op.
    Unchanged,
    /// Row from a replace op.
    Replaced,
    /// Row from a delete op.
    Deleted,
    /// Row from an insert op.
    Inserted,
    /// The single row emitted when nothing visible changed.
    NoChanges,
}

/// One rendered comparison row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedRow {
    /// Gutter label.
    pub marker: LineMarker,
    /// Original-side cell text.
    pub original: String,
    /// Optimized-side cell text.
    pub optimized: String,
    /// Class of the original cell.
    pub original_class: CellClass,
    /// Class of the optimized cell.
    pub optimized_class: CellClass,
    /// Op that produced the row.
    pub kind: RowKind,
}

impl AnnotatedRow {
    /// A line shared verbatim by both texts.
    #[must_use]
    pub fn unchanged(line_number: usize, text: &str) -> Self {
        Self {
            marker: LineMarker::Line(line_number),
            original: text.to_owned(),
            optimized: text.to_owned(),
            original_class: CellClass::Plain,
            optimized_class: CellClass::Plain,
            kind: RowKind::Unchanged,
        }
    }

    /// A changed row; the original cell is marked removed and the
    /// optimized cell added.
    #[must_use]
    pub fn changed(kind: RowKind, marker: LineMarker, original: &str, optimized: &str) -> Self {
        Self {
            marker,
            original: original.to_owned(),
            optimized: optimized.to_owned(),
            original_class: CellClass::Removed,
            optimized_class: CellClass::Added,
            kind,
        }
    }

    /// The sentinel row shown when there is nothing to compare.
    #[must_use]
    pub const fn no_changes() -> Self {
        Self {
            marker: LineMarker::Blank,
            original: String::new(),
            optimized: String::new(),
            original_class: CellClass::Plain,
            optimized_class: CellClass::Plain,
            kind: RowKind::NoChanges,
        }
    }
}

/// Ordered rows of one comparison. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDiff {
    rows: Vec<AnnotatedRow>,
}

impl RenderedDiff {
    fn from_rows(rows: Vec<AnnotatedRow>) -> Self {
        if rows.is_empty() {
            return Self {
                rows: vec![AnnotatedRow::no_changes()],
            };
        }
        Self { rows }
    }

    /// Rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[AnnotatedRow] {
        &self.rows
    }

    /// Consumes the diff, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<AnnotatedRow> {
        self.rows
    }

    /// Returns true when the diff is only the no-changes sentinel.
    #[must_use]
    pub fn is_no_changes(&self) -> bool {
        matches!(self.rows.as_slice(), [row] if row.kind == RowKind::NoChanges)
    }

    /// Returns true when at least one row is not unchanged.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.rows
            .iter()
            .any(|row| !matches!(row.kind, RowKind::Unchanged | RowKind::NoChanges))
    }
}

fn key_at(lines: &[NormalizedLine], index: usize) -> &str {
    lines.get(index).map_or("", NormalizedLine::key)
}

fn op_rows(
    op: &AlignmentOp,
    original: &[NormalizedLine],
    optimized: &[NormalizedLine],
) -> Vec<AnnotatedRow> {
    match op.tag {
        OpTag::Equal => op
            .original
            .clone()
            .map(|i| AnnotatedRow::unchanged(i + 1, key_at(original, i)))
            .collect(),
        OpTag::Replace => {
            let width = op.original.len().max(op.optimized.len());
            (0..width)
                .filter_map(|offset| {
                    let i = op.original.start + offset;
                    let j = op.optimized.start + offset;
                    let old = if op.original.contains(&i) {
                        key_at(original, i)
                    } else {
                        ""
                    };
                    let new = if op.optimized.contains(&j) {
                        key_at(optimized, j)
                    } else {
                        ""
                    };
                    if old.is_empty() && new.is_empty() {
                        return None;
                    }
                    Some(AnnotatedRow::changed(
                        RowKind::Replaced,
                        LineMarker::Line(i + 1),
                        old,
                        new,
                    ))
                })
                .collect()
        }
        OpTag::Delete => op
            .original
            .clone()
            .filter_map(|i| {
                let old = key_at(original, i);
                (!old.is_empty()).then(|| {
                    AnnotatedRow::changed(RowKind::Deleted, LineMarker::Line(i + 1), old, "")
                })
            })
            .collect(),
        OpTag::Insert => op
            .optimized
            .clone()
            .filter_map(|j| {
                let new = key_at(optimized, j);
                (!new.is_empty()).then(|| {
                    AnnotatedRow::changed(RowKind::Inserted, LineMarker::Inserted, "", new)
                })
            })
            .collect(),
    }
}

/// Expands ops into rows, suppressing rows whose visible content would be
/// empty on both sides.
///
/// Equal rows are always kept so line numbers stay continuous. If every row
/// is suppressed the result is the single no-changes row.
#[must_use]
pub fn render_rows(
    ops: &[AlignmentOp],
    original: &[NormalizedLine],
    optimized: &[NormalizedLine],
) -> RenderedDiff {
    let rows = ops
        .iter()
        .flat_map(|op| op_rows(op, original, optimized))
        .collect();
    RenderedDiff::from_rows(rows)
}

/// Splits, normalizes, aligns and renders two texts as given.
///
/// When neither text has a printable character the result is the
/// no-changes row.
#[must_use]
pub fn diff_texts(original: &str, optimized: &str) -> RenderedDiff {
    let original_source = SourceText::split(original);
    let optimized_source = SourceText::split(optimized);
    if original_source.is_blank() && optimized_source.is_blank() {
        return RenderedDiff::from_rows(Vec::new());
    }

    let original_lines = normalize_lines(original_source.lines());
    let optimized_lines = normalize_lines(optimized_source.lines());

    let original_keys: Vec<&str> = original_lines.iter().map(NormalizedLine::key).collect();
    let optimized_keys: Vec<&str> = optimized_lines.iter().map(NormalizedLine::key).collect();
    let ops = align(&original_keys, &optimized_keys);
    tracing::debug!(
        "aligned {} original and {} optimized lines into {} ops",
        original_keys.len(),
        optimized_keys.len(),
        ops.len()
    );

    render_rows(&ops, &original_lines, &optimized_lines)
}

/// HTML-escapes both texts and renders their annotated comparison.
///
/// # Example
///
/// ```
/// use optiview::diff::{LineMarker, align_and_render};
///
/// let diff = align_and_render("a\nb", "a\nb\nc");
/// let markers: Vec<_> = diff.rows().iter().map(|row| row.marker).collect();
///
/// assert_eq!(
///     markers,
///     vec![LineMarker::Line(1), LineMarker::Line(2), LineMarker::Inserted]
/// );
/// ```
#[must_use]
pub fn align_and_render(original: &str, optimized: &str) -> RenderedDiff {
    diff_texts(&escape_html(original), &escape_html(optimized))
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
