//! Removal of markdown code fences wrapped around generated code.

const FENCE: &str = "```";

/// Strips an enclosing markdown code fence from generator output.
///
/// Text that does not start with a triple-backtick fence (after trimming)
/// is returned unchanged. Otherwise the backtick runs at both ends are
/// removed and, when the remainder spans several lines, the first line
/// (the fence's language tag) and the last line (the closing fence) are
/// dropped.
///
/// An opening fence without a closing one still loses its final line,
/// which is real code in that case.
///
/// # Example
///
/// ```
/// use optiview::diff::strip_fence;
///
/// assert_eq!(strip_fence("```cpp\nint main(){}\n```"), "int main(){}");
/// assert_eq!(strip_fence("int main(){}"), "int main(){}");
/// ```
#[must_use]
pub fn strip_fence(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with(FENCE) {
        return raw.to_owned();
    }

    let unticked = trimmed.trim_matches('`');
    if !unticked.contains('\n') {
        return unticked.to_owned();
    }

    let lines: Vec<&str> = unticked.split('\n').collect();
    let interior = lines
        .get(1..lines.len().saturating_sub(1))
        .unwrap_or_default();

    interior.join("\n").trim().to_owned()
}
