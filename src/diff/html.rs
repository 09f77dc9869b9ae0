//! HTML fragment rendering of an annotated diff.
//!
//! Each row becomes one `<div class="diff-row">` holding the gutter label
//! and the two code cells. Changed cells carry `diff-del` (original side)
//! or `diff-add` (optimized side). Rows are separated by newlines so the
//! fragment can be embedded directly by a page template.
//!
//! Cell text is expected to be escaped already (see
//! [`align_and_render`](super::align_and_render)), so template
//! auto-escaping is disabled.

use minijinja::{Environment, context};
use serde::Serialize;

use crate::error::OptimizeError;

use super::render::{AnnotatedRow, CellClass, RenderedDiff, RowKind};

const TEMPLATE_NAME: &str = "diff_rows";

const ROWS_TEMPLATE: &str = concat!(
    "{% for row in rows %}{% if not loop.first %}\n{% endif %}",
    "<div class=\"diff-row\">",
    "<span class=\"diff-line-num\">{{ row.marker }}</span>",
    "<span class=\"diff-code orig{{ row.original_class }}\">{{ row.original }}</span>",
    "<span class=\"diff-code opt{{ row.optimized_class }}\">{{ row.optimized }}</span>",
    "</div>{% endfor %}"
);

/// Label printed in the original cell of the no-changes row.
pub const NO_CHANGES_LABEL: &str = "No changes";

/// Template-facing view of one row.
#[derive(Debug, Clone, Serialize)]
struct TemplateRow {
    marker: String,
    original: String,
    optimized: String,
    original_class: &'static str,
    optimized_class: &'static str,
}

const fn class_suffix(class: CellClass) -> &'static str {
    match class {
        CellClass::Plain => "",
        CellClass::Added => " diff-add",
        CellClass::Removed => " diff-del",
    }
}

impl From<&AnnotatedRow> for TemplateRow {
    fn from(row: &AnnotatedRow) -> Self {
        let original = if row.kind == RowKind::NoChanges {
            NO_CHANGES_LABEL.to_owned()
        } else {
            row.original.clone()
        };
        Self {
            marker: row.marker.to_string(),
            original,
            optimized: row.optimized.clone(),
            original_class: class_suffix(row.original_class),
            optimized_class: class_suffix(row.optimized_class),
        }
    }
}

/// Renders the diff as an HTML fragment, one `div` per row.
///
/// # Errors
///
/// Returns [`OptimizeError::Template`] if the row template fails to compile
/// or render.
pub fn render_html(diff: &RenderedDiff) -> Result<String, OptimizeError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
    env.add_template(TEMPLATE_NAME, ROWS_TEMPLATE)
        .map_err(|error| OptimizeError::Template {
            message: format!("invalid diff template: {error}"),
        })?;

    let rows: Vec<TemplateRow> = diff.rows().iter().map(TemplateRow::from).collect();
    let template = env
        .get_template(TEMPLATE_NAME)
        .map_err(|error| OptimizeError::Template {
            message: format!("diff template unavailable: {error}"),
        })?;

    template
        .render(context! { rows => rows })
        .map_err(|error| OptimizeError::Template {
            message: format!("diff rendering failed: {error}"),
        })
}
