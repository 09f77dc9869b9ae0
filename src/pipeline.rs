//! End-to-end optimisation of one code submission.
//!
//! The generator is called twice: once to rewrite the code and once to
//! explain the rewrite. The diff engine runs between the two calls on the
//! original code and the fence-stripped rewrite.

use serde::Serialize;

use crate::ai::{CompletionService, OptimizationTarget, optimize_request, review_request};
use crate::diff::{AnnotatedRow, align_and_render, render_html, strip_fence};
use crate::error::OptimizeError;
use crate::review::{CommentList, format_comments};

/// One code submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeRequest {
    code: String,
    target: OptimizationTarget,
    context: String,
}

impl OptimizeRequest {
    /// Constructs a request; `context` may be empty.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        target: OptimizationTarget,
        context: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            target,
            context: context.into(),
        }
    }

    /// Submitted source code.
    #[must_use]
    pub const fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Language and goal of the optimisation.
    #[must_use]
    pub const fn target(&self) -> &OptimizationTarget {
        &self.target
    }

    /// Optional task description; empty when absent.
    #[must_use]
    pub const fn context(&self) -> &str {
        self.context.as_str()
    }
}

/// Result of optimising one submission.
///
/// Serialises with the field names the web front end expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationReport {
    /// Fence-stripped optimized code.
    #[serde(rename = "optimizedcode")]
    pub optimized_code: String,
    /// Annotated comparison as an HTML fragment.
    #[serde(rename = "annotatedcode")]
    pub annotated_code: String,
    /// Review comments, never empty.
    pub comments: CommentList,
    /// The same comparison as structured rows.
    pub rows: Vec<AnnotatedRow>,
}

/// Runs the optimisation and review calls around the diff engine.
///
/// A failed review call degrades to the fallback comments instead of
/// failing the request, since both listings are available at that point.
///
/// # Errors
///
/// Returns the generator's error when the optimisation call fails, and
/// [`OptimizeError::Template`] if the diff cannot be rendered.
pub fn optimize_code(
    service: &dyn CompletionService,
    request: &OptimizeRequest,
) -> Result<OptimizationReport, OptimizeError> {
    let target = request.target();
    tracing::info!(
        "optimising {} bytes of {} code for {}",
        request.code().len(),
        target.language(),
        target.goal()
    );

    let generated = service.complete(&optimize_request(request.code(), target, request.context()))?;
    let optimized_code = strip_fence(generated.trim());

    let diff = align_and_render(request.code(), &optimized_code);
    let annotated_code = render_html(&diff)?;

    let review_text = match service.complete(&review_request(request.code(), &optimized_code)) {
        Ok(text) => text,
        Err(error) => {
            tracing::warn!("review request failed; using fallback comments: {error}");
            String::new()
        }
    };
    let comments = format_comments(&review_text, request.context(), target);

    Ok(OptimizationReport {
        optimized_code,
        annotated_code,
        comments,
        rows: diff.into_rows(),
    })
}
