//! HTTP surface exposing `POST /api/optimize`.
//!
//! Requests carry `code` (required), `language`, `goal` and `context`
//! either as a JSON object or as `multipart/form-data` fields. Responses
//! are the serialised [`OptimizationReport`](crate::pipeline::OptimizationReport)
//! or `{"error": "..."}` with a status reflecting the failure.

mod payload;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use http::StatusCode;
use serde::Serialize;

use crate::ai::{CompletionService, OptimizationTarget};
use crate::error::OptimizeError;
use crate::pipeline::optimize_code;

pub use payload::OptimizePayload;

/// Route serving optimisation requests.
pub const OPTIMIZE_ROUTE: &str = "/api/optimize";

/// Shared state of the HTTP service.
#[derive(Debug, Clone)]
pub struct AppState {
    service: Arc<dyn CompletionService>,
    defaults: OptimizationTarget,
}

impl AppState {
    /// Wraps the generator and the language/goal used when a request omits
    /// them.
    #[must_use]
    pub fn new(service: Arc<dyn CompletionService>, defaults: OptimizationTarget) -> Self {
        Self { service, defaults }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps an [`OptimizeError`] to the status reported to HTTP callers.
#[must_use]
pub const fn status_for(error: &OptimizeError) -> StatusCode {
    match error {
        OptimizeError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
        OptimizeError::Network { .. } | OptimizeError::Api { .. } => StatusCode::BAD_GATEWAY,
        OptimizeError::Configuration { .. }
        | OptimizeError::Io { .. }
        | OptimizeError::Template { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &OptimizeError) -> Response {
    let status = status_for(error);
    if status.is_server_error() {
        tracing::error!("optimisation request failed: {error}");
    } else {
        tracing::info!("rejected optimisation request: {error}");
    }
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}

async fn optimize(State(state): State<AppState>, request: Request) -> Response {
    let payload = match OptimizePayload::from_request_body(request).await {
        Ok(payload) => payload,
        Err(error) => return error_response(&error),
    };
    let optimize_request = match payload.into_request(&state.defaults) {
        Ok(optimize_request) => optimize_request,
        Err(error) => return error_response(&error),
    };

    let service = Arc::clone(&state.service);
    let outcome =
        tokio::task::spawn_blocking(move || optimize_code(service.as_ref(), &optimize_request))
            .await;

    match outcome {
        Ok(Ok(report)) => Json(report).into_response(),
        Ok(Err(error)) => error_response(&error),
        Err(join_error) => error_response(&OptimizeError::Io {
            message: format!("optimisation task failed: {join_error}"),
        }),
    }
}

/// Builds the router for the optimisation service.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(OPTIMIZE_ROUTE, post(optimize))
        .with_state(state)
}

/// Serves the router on `address` until the process stops.
///
/// # Errors
///
/// Returns [`OptimizeError::Io`] when the address cannot be bound or the
/// server stops with an error.
pub async fn serve(address: SocketAddr, state: AppState) -> Result<(), OptimizeError> {
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| OptimizeError::Io {
            message: format!("failed to bind {address}: {error}"),
        })?;
    tracing::info!("listening on http://{address}{OPTIMIZE_ROUTE}");

    axum::serve(listener, router(state))
        .await
        .map_err(|error| OptimizeError::Io {
            message: format!("HTTP server stopped: {error}"),
        })
}
