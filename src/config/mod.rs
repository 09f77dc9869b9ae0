//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.optiview.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `OPTIVIEW_*`, plus the legacy
//!    `YANDEXIAMTOKEN` and `YANDEXFOLDERID` for the generator credentials
//! 4. **Command-line arguments** – `--source`/`-s`, `--serve`, and friends
//!
//! # Configuration File
//!
//! ```toml
//! language = "cpp"
//! goal = "performance"
//! bind_address = "127.0.0.1:8080"
//! ai_folder_id = "b1gexample"
//! ai_timeout_seconds = 30
//! ```

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::ai::{
    DEFAULT_BASE_URL, DEFAULT_GOAL, DEFAULT_LANGUAGE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, OptimizationTarget, YandexGptConfig,
};
use crate::error::OptimizeError;

/// Default listen address of the HTTP service.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Legacy environment variable holding the generator API key.
pub const LEGACY_API_KEY_ENV: &str = "YANDEXIAMTOKEN";

/// Legacy environment variable holding the generator folder id.
pub const LEGACY_FOLDER_ID_ENV: &str = "YANDEXFOLDERID";

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Optimise one source file and print the result.
    OptimizeFile,
    /// Serve `POST /api/optimize` over HTTP.
    Serve,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `OPTIVIEW_SOURCE` or `--source`: Source file to optimise
/// - `OPTIVIEW_LANGUAGE` or `--language`: Language name passed to the prompts
/// - `OPTIVIEW_GOAL` or `--goal`: Optimisation goal
/// - `OPTIVIEW_AI_API_KEY`, `YANDEXIAMTOKEN`, or `--ai-api-key`: Generator key
/// - `OPTIVIEW_AI_FOLDER_ID`, `YANDEXFOLDERID`, or `--ai-folder-id`: Folder id
///
/// # Example
///
/// ```no_run
/// use optiview::OptiviewConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = OptiviewConfig::load().expect("failed to load configuration");
/// let mode = config.operation_mode().expect("a mode must be selected");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "OPTIVIEW",
    discovery(
        dotfile_name = ".optiview.toml",
        config_file_name = "optiview.toml",
        app_name = "optiview"
    )
)]
pub struct OptiviewConfig {
    /// Path of the source file to optimise.
    ///
    /// Can be provided via:
    /// - CLI: `--source <FILE>` or `-s <FILE>`
    /// - Environment: `OPTIVIEW_SOURCE`
    #[ortho_config(cli_short = 's')]
    pub source: Option<String>,

    /// Programming language named in the prompts.
    ///
    /// Also the default for HTTP requests that omit `language`.
    #[ortho_config(cli_short = 'l')]
    pub language: String,

    /// Optimisation goal, such as `readability` or `performance`.
    ///
    /// Also the default for HTTP requests that omit `goal`.
    #[ortho_config(cli_short = 'g')]
    pub goal: String,

    /// Free-text task description forwarded to the generator.
    #[ortho_config(cli_short = 'c')]
    pub context: Option<String>,

    /// Prints the report as JSON instead of text.
    #[ortho_config(cli_short = 'j')]
    pub json: bool,

    /// Starts the HTTP service instead of optimising a file.
    ///
    /// Can be provided via:
    /// - CLI: `--serve`
    /// - Config file: `serve = true`
    #[ortho_config()]
    pub serve: bool,

    /// Socket address the HTTP service listens on.
    #[ortho_config()]
    pub bind_address: String,

    /// Base URL of the foundation-models completion API.
    #[ortho_config()]
    pub ai_base_url: String,

    /// Model path inside the folder, such as `yandexgpt/latest`.
    #[ortho_config()]
    pub ai_model: String,

    /// API key used as a bearer token.
    ///
    /// Can be provided via:
    /// - CLI: `--ai-api-key <KEY>`
    /// - Environment: `OPTIVIEW_AI_API_KEY` or `YANDEXIAMTOKEN` (legacy)
    #[ortho_config()]
    pub ai_api_key: Option<String>,

    /// Cloud folder id the model URI is built from.
    ///
    /// Can be provided via:
    /// - CLI: `--ai-folder-id <ID>`
    /// - Environment: `OPTIVIEW_AI_FOLDER_ID` or `YANDEXFOLDERID` (legacy)
    #[ortho_config()]
    pub ai_folder_id: Option<String>,

    /// Request timeout for generator calls, in seconds.
    #[ortho_config()]
    pub ai_timeout_seconds: u64,

    /// Sampling temperature, between 0 and 1.
    #[ortho_config()]
    pub ai_temperature: f64,

    /// Upper bound on generated tokens per call.
    #[ortho_config()]
    pub ai_max_tokens: u32,
}

impl Default for OptiviewConfig {
    fn default() -> Self {
        Self {
            source: None,
            language: DEFAULT_LANGUAGE.to_owned(),
            goal: DEFAULT_GOAL.to_owned(),
            context: None,
            json: false,
            serve: false,
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            ai_base_url: DEFAULT_BASE_URL.to_owned(),
            ai_model: DEFAULT_MODEL.to_owned(),
            ai_api_key: None,
            ai_folder_id: None,
            ai_timeout_seconds: DEFAULT_TIMEOUT_SECS,
            ai_temperature: DEFAULT_TEMPERATURE,
            ai_max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl OptiviewConfig {
    /// Resolves the generator API key from configuration or the legacy
    /// `YANDEXIAMTOKEN` environment variable.
    #[must_use]
    pub fn resolve_ai_api_key(&self) -> Option<String> {
        self.ai_api_key
            .clone()
            .or_else(|| env::var(LEGACY_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Resolves the folder id from configuration or the legacy
    /// `YANDEXFOLDERID` environment variable.
    #[must_use]
    pub fn resolve_ai_folder_id(&self) -> Option<String> {
        self.ai_folder_id
            .clone()
            .or_else(|| env::var(LEGACY_FOLDER_ID_ENV).ok())
            .filter(|folder| !folder.trim().is_empty())
    }

    /// Validates that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::Configuration`] when `serve` is combined
    /// with `source`, the timeout is zero, the temperature lies outside
    /// `0..=1`, or the base URL is not an absolute HTTP(S) URL.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.serve && self.source.is_some() {
            return Err(configuration(
                "--serve and --source are mutually exclusive; choose one mode",
            ));
        }
        if self.ai_timeout_seconds == 0 {
            return Err(configuration("ai_timeout_seconds must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.ai_temperature) {
            return Err(OptimizeError::Configuration {
                message: format!(
                    "ai_temperature must be between 0 and 1, got {}",
                    self.ai_temperature
                ),
            });
        }
        let base_url = Url::parse(&self.ai_base_url).map_err(|error| OptimizeError::Configuration {
            message: format!("ai_base_url `{}` is not a valid URL: {error}", self.ai_base_url),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(OptimizeError::Configuration {
                message: format!(
                    "ai_base_url must use http or https, got `{}`",
                    base_url.scheme()
                ),
            });
        }
        Ok(())
    }

    /// Determines the operation mode based on provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::Configuration`] when neither or both modes
    /// are selected.
    pub fn operation_mode(&self) -> Result<OperationMode, OptimizeError> {
        match (self.serve, self.source.is_some()) {
            (true, false) => Ok(OperationMode::Serve),
            (false, true) => Ok(OperationMode::OptimizeFile),
            (true, true) => Err(configuration(
                "--serve and --source are mutually exclusive; choose one mode",
            )),
            (false, false) => Err(configuration(
                "nothing to do: pass --source <FILE> to optimise a file or --serve to start the HTTP service",
            )),
        }
    }

    /// Returns the source path or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::Configuration`] when no source is configured.
    pub fn require_source(&self) -> Result<&str, OptimizeError> {
        self.source
            .as_deref()
            .ok_or_else(|| configuration("a source file is required (use --source or -s)"))
    }

    /// Parses the HTTP listen address.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::Configuration`] when the address does not
    /// parse as `host:port`.
    pub fn resolve_bind_address(&self) -> Result<SocketAddr, OptimizeError> {
        self.bind_address
            .parse()
            .map_err(|error| OptimizeError::Configuration {
                message: format!("invalid bind_address `{}`: {error}", self.bind_address),
            })
    }

    /// Language and goal used for file mode and as HTTP defaults.
    #[must_use]
    pub fn target(&self) -> OptimizationTarget {
        OptimizationTarget::new(self.language.clone(), self.goal.clone())
    }

    /// Builds the generator client settings, resolving legacy credentials.
    #[must_use]
    pub fn generator_config(&self) -> YandexGptConfig {
        YandexGptConfig::new(
            self.ai_base_url.clone(),
            self.resolve_ai_api_key(),
            self.resolve_ai_folder_id(),
            Duration::from_secs(self.ai_timeout_seconds),
        )
        .with_model(self.ai_model.clone())
        .with_sampling(self.ai_temperature, self.ai_max_tokens)
    }
}

fn configuration(message: &str) -> OptimizeError {
    OptimizeError::Configuration {
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests;
