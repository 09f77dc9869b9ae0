//! Text-generation client used to rewrite code and explain the rewrite.
//!
//! The pipeline only depends on [`CompletionService`]; [`YandexGptService`]
//! is the HTTP implementation wired up by the binary.

mod model;
mod prompts;
mod service;
mod yandex;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use model::{CompletionRequest, DEFAULT_GOAL, DEFAULT_LANGUAGE, OptimizationTarget};
pub use prompts::{optimize_request, review_request};
#[cfg(test)]
pub use service::MockCompletionService;
pub use service::CompletionService;
pub use yandex::{
    DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
    YandexGptConfig, YandexGptService,
};
