//! `YandexGPT` foundation-models HTTP implementation of text generation.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::OptimizeError;

use super::model::CompletionRequest;
use super::service::CompletionService;

/// Default foundation-models API root.
pub const DEFAULT_BASE_URL: &str = "https://llm.api.cloud.yandex.net/foundationModels/v1";
/// Default model path appended to the folder in the model URI.
pub const DEFAULT_MODEL: &str = "yandexgpt/latest";
/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
/// Default completion length limit, in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

const ERROR_BODY_PREVIEW_CHARS: usize = 160;

/// Configuration for [`YandexGptService`].
///
/// Credentials are supplied explicitly; the service never reads the process
/// environment.
#[derive(Debug, Clone, PartialEq)]
pub struct YandexGptConfig {
    /// Base API URL (e.g., `https://llm.api.cloud.yandex.net/foundationModels/v1`).
    pub base_url: String,
    /// Model path inside the folder (e.g., `yandexgpt/latest`).
    pub model: String,
    /// IAM token used for bearer authentication.
    pub api_key: Option<String>,
    /// Cloud folder that owns the model.
    pub folder_id: Option<String>,
    /// HTTP timeout.
    pub timeout: Duration,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion length limit.
    pub max_tokens: u32,
}

impl Default for YandexGptConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            folder_id: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl YandexGptConfig {
    /// Constructs configuration with the connection settings; sampling
    /// options keep their defaults.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        folder_id: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            folder_id,
            timeout,
            ..Self::default()
        }
    }

    /// Overrides the model path.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides temperature and token limit.
    #[must_use]
    pub fn with_sampling(mut self, temperature: f64, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }
}

/// `YandexGPT` completion service.
#[derive(Debug, Clone, Default)]
pub struct YandexGptService {
    config: YandexGptConfig,
}

impl YandexGptService {
    /// Creates a service from explicit configuration.
    #[must_use]
    pub const fn new(config: YandexGptConfig) -> Self {
        Self { config }
    }

    fn extract_api_key(&self) -> Result<&str, OptimizeError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| OptimizeError::Configuration {
                message: concat!(
                    "generator API key is required (use --ai-api-key, ",
                    "OPTIVIEW_AI_API_KEY, or YANDEXIAMTOKEN)"
                )
                .to_owned(),
            })
    }

    fn extract_folder_id(&self) -> Result<&str, OptimizeError> {
        self.config
            .folder_id
            .as_deref()
            .ok_or_else(|| OptimizeError::Configuration {
                message: concat!(
                    "generator folder id is required (use --ai-folder-id, ",
                    "OPTIVIEW_AI_FOLDER_ID, or YANDEXFOLDERID)"
                )
                .to_owned(),
            })
    }

    fn create_http_client(&self) -> Result<Client, OptimizeError> {
        Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|error| OptimizeError::Configuration {
                message: format!("failed to configure generator HTTP client: {error}"),
            })
    }

    fn endpoint(&self) -> String {
        format!("{}/completion", self.config.base_url.trim_end_matches('/'))
    }
}

impl CompletionService for YandexGptService {
    fn complete(&self, request: &CompletionRequest) -> Result<String, OptimizeError> {
        let api_key = self.extract_api_key()?;
        let folder_id = self.extract_folder_id()?;
        let payload = build_payload(&self.config, folder_id, request);
        let client = self.create_http_client()?;

        tracing::debug!("requesting completion from {}", self.endpoint());
        let response = client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .map_err(|error| OptimizeError::Network {
                message: format!("generator request transport failed: {error}"),
            })?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().map_or_else(
                |_| "(failed to read error response body)".to_owned(),
                |content| truncate_for_message(content.as_str(), ERROR_BODY_PREVIEW_CHARS),
            );
            tracing::warn!("generator returned status {}: {body}", status.as_u16());
            return Err(OptimizeError::Api {
                message: format!(
                    "generator request failed with status {}: {body}",
                    status.as_u16()
                ),
            });
        }

        let response_payload: CompletionResponse =
            response.json().map_err(|error| OptimizeError::Api {
                message: format!("generator response JSON decoding failed: {error}"),
            })?;

        first_alternative_text(&response_payload).ok_or_else(|| OptimizeError::Api {
            message: "generator response did not contain any alternative text".to_owned(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionPayload<'a> {
    model_uri: String,
    completion_options: CompletionOptions,
    messages: Vec<PayloadMessage<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionOptions {
    stream: bool,
    temperature: f64,
    /// The API takes the limit as a decimal string.
    max_tokens: String,
}

#[derive(Debug, Serialize)]
struct PayloadMessage<'a> {
    role: &'static str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    result: CompletionResult,
}

#[derive(Debug, Deserialize)]
struct CompletionResult {
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    message: AlternativeMessage,
}

#[derive(Debug, Deserialize)]
struct AlternativeMessage {
    text: String,
}

fn build_payload<'a>(
    config: &YandexGptConfig,
    folder_id: &str,
    request: &'a CompletionRequest,
) -> CompletionPayload<'a> {
    CompletionPayload {
        model_uri: format!("gpt://{folder_id}/{}", config.model),
        completion_options: CompletionOptions {
            stream: false,
            temperature: config.temperature,
            max_tokens: config.max_tokens.to_string(),
        },
        messages: vec![
            PayloadMessage {
                role: "system",
                text: request.system_prompt(),
            },
            PayloadMessage {
                role: "user",
                text: request.user_text(),
            },
        ],
    }
}

fn first_alternative_text(response: &CompletionResponse) -> Option<String> {
    response
        .result
        .alternatives
        .first()
        .map(|alternative| alternative.message.text.trim())
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output = String::new();
    let mut chars = message.chars();

    for _ in 0..max_chars {
        let Some(character) = chars.next() else {
            return output;
        };
        output.push(character);
    }

    if chars.next().is_some() {
        output.push_str("...");
    }

    output
}

#[cfg(test)]
#[path = "yandex_tests.rs"]
mod tests;
