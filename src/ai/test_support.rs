//! Test-support utilities for generator-backed flows.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::OptimizeError;

use super::{CompletionRequest, CompletionService};

/// Deterministic completion stub that replays scripted responses in call
/// order and records the requests it received.
///
/// Once the script is exhausted every further call fails with an
/// [`OptimizeError::Api`].
#[derive(Debug, Default)]
pub struct StubCompletionService {
    responses: Mutex<VecDeque<Result<String, OptimizeError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletionService {
    /// Creates a stub that answers successive calls with `responses`.
    #[must_use]
    pub fn scripted(responses: impl IntoIterator<Item = Result<String, OptimizeError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a stub answering the optimisation call and then the review
    /// call with the given texts.
    #[must_use]
    pub fn answering(optimized: impl Into<String>, review: impl Into<String>) -> Self {
        Self::scripted([Ok(optimized.into()), Ok(review.into())])
    }

    /// Creates a stub whose first call fails with `error`.
    #[must_use]
    pub fn failing(error: OptimizeError) -> Self {
        Self::scripted([Err(error)])
    }

    /// Requests received so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl CompletionService for StubCompletionService {
    fn complete(&self, request: &CompletionRequest) -> Result<String, OptimizeError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front())
            .unwrap_or_else(|| {
                Err(OptimizeError::Api {
                    message: "stub completion script exhausted".to_owned(),
                })
            })
    }
}
