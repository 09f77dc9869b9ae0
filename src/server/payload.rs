//! Decoding of `POST /api/optimize` bodies.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use http::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::ai::OptimizationTarget;
use crate::error::OptimizeError;
use crate::pipeline::OptimizeRequest;

/// Upper bound on accepted request bodies.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Fields accepted by the optimisation endpoint.
///
/// Every field is optional at the decoding stage; [`Self::into_request`]
/// enforces the presence of `code` and applies the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OptimizePayload {
    /// Source code to optimise.
    #[serde(default)]
    pub code: Option<String>,
    /// Programming language name.
    #[serde(default)]
    pub language: Option<String>,
    /// Optimisation goal.
    #[serde(default)]
    pub goal: Option<String>,
    /// Free-text task description.
    #[serde(default)]
    pub context: Option<String>,
}

impl OptimizePayload {
    /// Decodes a request body as multipart form data or JSON depending on
    /// its content type.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::InvalidRequest`] when the body cannot be
    /// read or decoded.
    pub async fn from_request_body(request: Request) -> Result<Self, OptimizeError> {
        if is_multipart(&request) {
            let multipart = Multipart::from_request(request, &())
                .await
                .map_err(|rejection| invalid(format!("malformed multipart body: {rejection}")))?;
            return Self::from_multipart(multipart).await;
        }

        let body = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|error| invalid(format!("failed to read request body: {error}")))?;
        Self::from_json(&body)
    }

    fn from_json(body: &Bytes) -> Result<Self, OptimizeError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|error| invalid(format!("malformed JSON body: {error}")))
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, OptimizeError> {
        let mut payload = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|error| invalid(format!("malformed multipart field: {error}")))?
        {
            let Some(name) = field.name().map(ToOwned::to_owned) else {
                continue;
            };
            let value = field
                .text()
                .await
                .map_err(|error| invalid(format!("unreadable multipart field `{name}`: {error}")))?;
            match name.as_str() {
                "code" => payload.code = Some(value),
                "language" => payload.language = Some(value),
                "goal" => payload.goal = Some(value),
                "context" => payload.context = Some(value),
                _ => tracing::debug!("ignoring unknown form field `{name}`"),
            }
        }
        Ok(payload)
    }

    /// Validates the payload and fills omitted fields from `defaults`.
    ///
    /// Empty `language` or `goal` values count as omitted.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::InvalidRequest`] when `code` is missing or
    /// empty.
    pub fn into_request(
        self,
        defaults: &OptimizationTarget,
    ) -> Result<OptimizeRequest, OptimizeError> {
        let code = self
            .code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| invalid("No code provided".to_owned()))?;
        let language = non_empty_or(self.language, defaults.language());
        let goal = non_empty_or(self.goal, defaults.goal());

        Ok(OptimizeRequest::new(
            code,
            OptimizationTarget::new(language, goal),
            self.context.unwrap_or_default(),
        ))
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

const fn invalid(message: String) -> OptimizeError {
    OptimizeError::InvalidRequest { message }
}
