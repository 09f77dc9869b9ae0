//! HTTP service mode.

use std::sync::Arc;

use optiview::ai::YandexGptService;
use optiview::server::{self, AppState};
use optiview::{OptimizeError, OptiviewConfig};

/// Starts the HTTP service on the configured address.
///
/// Missing generator credentials are reported per request rather than at
/// startup, so the service can come up before they are provisioned.
///
/// # Errors
///
/// Returns an error if the bind address is invalid or the listener fails.
pub async fn run(config: &OptiviewConfig) -> Result<(), OptimizeError> {
    let address = config.resolve_bind_address()?;
    let generator = config.generator_config();
    if generator.api_key.is_none() || generator.folder_id.is_none() {
        tracing::warn!("generator credentials are incomplete; requests will fail until they are set");
    }

    let state = AppState::new(Arc::new(YandexGptService::new(generator)), config.target());
    server::serve(address, state).await
}
