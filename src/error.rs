//! Error types surfaced by the optimisation service.

use thiserror::Error;

/// Errors raised while configuring, calling the generator, or serving
/// optimisation requests.
///
/// The diff engine itself is total and never produces one of these; they
/// come from the I/O wrapped around it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OptimizeError {
    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Networking failed while calling the text-generation service.
    #[error("network error talking to the generator: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The text-generation service answered with an error or an unusable
    /// payload.
    #[error("generator API error: {message}")]
    Api {
        /// Status and body excerpt describing the failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// An incoming optimisation request was malformed.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Which field or body part was rejected.
        message: String,
    },

    /// The annotated diff could not be rendered.
    #[error("template error: {message}")]
    Template {
        /// Error reported by the template engine.
        message: String,
    },
}

impl OptimizeError {
    /// Returns true when the failure originated at the generator, either in
    /// transport or in its response.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Api { .. })
    }
}
