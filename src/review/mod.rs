//! Conversion of free-text review output into bullet comments.

use serde::Serialize;

use crate::ai::OptimizationTarget;

/// Number of context characters quoted in the task comment.
pub const CONTEXT_PREVIEW_CHARS: usize = 120;

const BULLET_CHARS: &[char] = &['-', '•', ' ', '\t'];

/// Ordered, non-empty list of review comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommentList(Vec<String>);

impl CommentList {
    /// Comments in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of comments. Always at least one.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the list, returning the comments.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a CommentList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn context_comment(context: &str) -> String {
    let preview: String = context.chars().take(CONTEXT_PREVIEW_CHARS).collect();
    format!("Task: {preview}...")
}

fn fallback_comment(target: &OptimizationTarget) -> String {
    format!(
        "Goal: {}, language: {}.",
        target.goal(),
        target.language()
    )
}

/// Builds the comment list shown next to an optimized listing.
///
/// Each line of `review_text` loses leading and trailing bullet characters
/// (`-`, `•`, spaces, tabs); lines left empty are dropped. A non-empty
/// `context` adds a leading `Task: ...` comment quoting its first 120
/// characters. If nothing remains, a single comment naming the goal and
/// language is returned.
///
/// # Example
///
/// ```
/// use optiview::ai::OptimizationTarget;
/// use optiview::review::format_comments;
///
/// let target = OptimizationTarget::new("cpp", "readability");
/// let comments = format_comments("- Removed dead code\n", "", &target);
///
/// assert_eq!(comments.as_slice(), ["Removed dead code"]);
/// ```
#[must_use]
pub fn format_comments(
    review_text: &str,
    context: &str,
    target: &OptimizationTarget,
) -> CommentList {
    let mut comments: Vec<String> = Vec::new();
    if !context.is_empty() {
        comments.push(context_comment(context));
    }

    comments.extend(
        review_text
            .split('\n')
            .map(|line| line.trim_matches(BULLET_CHARS))
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned),
    );

    if comments.is_empty() {
        comments.push(fallback_comment(target));
    }

    CommentList(comments)
}
