//! Optiview CLI entrypoint: optimise one file or serve the HTTP API.

mod cli;

use std::io;
use std::process::ExitCode;

use optiview::{OperationMode, OptimizeError, OptiviewConfig};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if let Err(write_error) = cli::output::write_failure(&mut io::stderr().lock(), &error)
            {
                tracing::error!("failed to report `{error}`: {write_error}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays clean for the report.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), OptimizeError> {
    let config = load_config()?;
    config.validate()?;

    match config.operation_mode()? {
        OperationMode::OptimizeFile => {
            tokio::task::spawn_blocking(move || cli::optimize_file::run(&config))
                .await
                .map_err(|error| OptimizeError::Io {
                    message: format!("optimisation task failed: {error}"),
                })?
        }
        OperationMode::Serve => cli::serve::run(&config).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`OptimizeError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<OptiviewConfig, OptimizeError> {
    OptiviewConfig::load().map_err(|error| OptimizeError::Configuration {
        message: error.to_string(),
    })
}
