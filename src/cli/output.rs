//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use optiview::diff::{AnnotatedRow, CellClass, NO_CHANGES_LABEL, RenderedDiff};
use optiview::{OptimizationReport, OptimizeError};

/// Width of the line-marker column.
const MARKER_WIDTH: usize = 4;

/// Converts an I/O error into an [`OptimizeError::Io`].
pub fn io_error(error: &io::Error) -> OptimizeError {
    OptimizeError::Io {
        message: error.to_string(),
    }
}

/// Writes a failure message for the user.
///
/// # Errors
///
/// Returns the underlying I/O error when the writer fails.
pub fn write_failure<W: Write>(writer: &mut W, error: &OptimizeError) -> io::Result<()> {
    writeln!(writer, "{error}")
}

/// Writes the report as pretty-printed JSON.
pub fn write_report_json<W: Write>(
    writer: &mut W,
    report: &OptimizationReport,
) -> Result<(), OptimizeError> {
    let json = serde_json::to_string_pretty(report).map_err(|error| OptimizeError::Io {
        message: format!("failed to serialise report: {error}"),
    })?;
    writeln!(writer, "{json}").map_err(|error| io_error(&error))
}

/// Writes the optimized code, a plain-text side-by-side comparison, and the
/// review comments.
///
/// `comparison` must be computed on unescaped text; the report's own rows
/// are HTML-escaped for the web front end.
pub fn write_report_text<W: Write>(
    writer: &mut W,
    report: &OptimizationReport,
    comparison: &RenderedDiff,
) -> Result<(), OptimizeError> {
    writeln!(writer, "Optimized code:").map_err(|error| io_error(&error))?;
    writeln!(writer, "{}", report.optimized_code).map_err(|error| io_error(&error))?;

    writeln!(writer, "\nComparison: original || optimized").map_err(|error| io_error(&error))?;
    write_comparison(writer, comparison)?;

    writeln!(writer, "\nComments:").map_err(|error| io_error(&error))?;
    for comment in &report.comments {
        writeln!(writer, "- {comment}").map_err(|error| io_error(&error))?;
    }
    Ok(())
}

fn write_comparison<W: Write>(
    writer: &mut W,
    comparison: &RenderedDiff,
) -> Result<(), OptimizeError> {
    if comparison.is_no_changes() {
        return writeln!(writer, "{NO_CHANGES_LABEL}").map_err(|error| io_error(&error));
    }

    let width = comparison
        .rows()
        .iter()
        .map(|row| row.original.chars().count())
        .max()
        .unwrap_or_default();
    for row in comparison.rows() {
        writeln!(writer, "{}", format_row(row, width)).map_err(|error| io_error(&error))?;
    }
    Ok(())
}

fn format_row(row: &AnnotatedRow, width: usize) -> String {
    let line = format!(
        "{marker:>marker_width$} {left}{original:<width$} ||{right}{optimized}",
        marker = row.marker.to_string(),
        marker_width = MARKER_WIDTH,
        left = cell_sign(row.original_class, &row.original),
        original = row.original,
        right = cell_sign(row.optimized_class, &row.optimized),
        optimized = row.optimized,
    );
    line.trim_end().to_owned()
}

const fn cell_sign(class: CellClass, text: &str) -> &'static str {
    if text.is_empty() {
        return "  ";
    }
    match class {
        CellClass::Plain => "  ",
        CellClass::Added => " +",
        CellClass::Removed => " -",
    }
}

#[cfg(test)]
mod tests {
    use optiview::{OptimizationReport, OptimizeError};
    use optiview::ai::OptimizationTarget;
    use optiview::diff::{RenderedDiff, diff_texts};
    use optiview::review::format_comments;
    use rstest::rstest;

    use super::{write_failure, write_report_json, write_report_text};

    fn report(optimized: &str, review_text: &str) -> OptimizationReport {
        OptimizationReport {
            optimized_code: optimized.to_owned(),
            annotated_code: String::new(),
            comments: format_comments(review_text, "", &OptimizationTarget::default()),
            rows: Vec::new(),
        }
    }

    fn render(report: &OptimizationReport, comparison: &RenderedDiff) -> String {
        let mut output = Vec::new();
        write_report_text(&mut output, report, comparison).expect("writing to a Vec succeeds");
        String::from_utf8(output).unwrap_or_default()
    }

    #[rstest]
    fn text_report_lists_code_rows_and_comments() {
        let comparison = diff_texts("int a;\nint b;", "int ab;");
        let text = render(&report("int ab;", "- Merged"), &comparison);

        assert_eq!(
            text,
            concat!(
                "Optimized code:\n",
                "int ab;\n",
                "\n",
                "Comparison: original || optimized\n",
                "   1  -int a; || +int ab;\n",
                "   2  -int b; ||\n",
                "\n",
                "Comments:\n",
                "- Merged\n",
            )
        );
    }

    #[rstest]
    fn text_report_keeps_angle_brackets_unescaped() {
        let comparison = diff_texts("#include <map>", "#include <vector>");
        let text = render(&report("#include <vector>", ""), &comparison);

        assert!(text.contains("-#include <map> || +#include <vector>"), "{text}");
    }

    #[rstest]
    fn text_report_prints_no_changes_label() {
        let comparison = diff_texts("", "");
        let text = render(&report("", ""), &comparison);

        assert!(text.contains("Comparison: original || optimized\nNo changes\n"));
    }

    #[rstest]
    fn json_report_uses_front_end_field_names() {
        let mut output = Vec::new();

        write_report_json(&mut output, &report("x", "ok")).expect("writing succeeds");

        let value: serde_json::Value =
            serde_json::from_slice(&output).expect("output should be JSON");
        assert_eq!(value["optimizedcode"], "x");
        assert_eq!(value["comments"][0], "ok");
    }

    #[rstest]
    fn failure_is_written_as_one_line() {
        let error = OptimizeError::Configuration {
            message: "source file is required".to_owned(),
        };
        let mut output = Vec::new();

        write_failure(&mut output, &error).expect("writing to a Vec succeeds");

        assert_eq!(
            String::from_utf8(output).unwrap_or_default(),
            format!("{error}\n")
        );
    }
}
