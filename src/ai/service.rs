//! Service abstraction for text generation.

use crate::error::OptimizeError;

use super::model::CompletionRequest;

/// Shared completion contract used by the pipeline, the CLI and the HTTP
/// service.
#[cfg_attr(test, mockall::automock)]
pub trait CompletionService: Send + Sync + std::fmt::Debug {
    /// Generate text answering a request.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError`] when the provider call fails or returns no
    /// usable text.
    fn complete(&self, request: &CompletionRequest) -> Result<String, OptimizeError>;
}
