use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use callcenter_core::config::{LlmConfig, LlmProvider};
use callcenter_core::errors::AgentError;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("language model is not configured")]
    Disabled,
    #[error("language model transport failed: {0}")]
    Transport(String),
    #[error("language model returned HTTP {status}")]
    Status { status: u16 },
    #[error("language model returned an empty completion")]
    EmptyCompletion,
    #[error("language model output is malformed: {0}")]
    Malformed(String),
}

impl From<LlmError> for AgentError {
    fn from(value: LlmError) -> Self {
        match value {
            LlmError::Malformed(detail) => Self::LanguageModelMalformedOutput(detail),
            other => Self::LanguageModelUnavailable(other.to_string()),
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Client for Ollama's `/api/generate` endpoint, non-streaming.
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| LlmError::Transport(err.to_string()))?;

        Ok(Self { client, endpoint: generate_endpoint(base_url), model: model.into(), api_key })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateRequest { model: &self.model, prompt, stream: false };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|err| LlmError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status { status: status.as_u16() });
        }

        let payload: GenerateResponse =
            response.json().await.map_err(|err| LlmError::Malformed(err.to_string()))?;
        let text = payload.response.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyCompletion);
        }
        Ok(text.to_string())
    }
}

/// Stand-in used when no model is configured; every call reports unavailability so the
/// engine runs on its deterministic fallbacks.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineClient;

#[async_trait]
impl LlmClient for OfflineClient {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }
}

pub fn client_from_config(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    match config.provider {
        LlmProvider::Offline => Ok(Arc::new(OfflineClient)),
        LlmProvider::Ollama => {
            let base_url = config.base_url.as_deref().ok_or(LlmError::Disabled)?;
            let client = OllamaClient::new(
                base_url,
                config.model.clone(),
                config.api_key.clone(),
                Duration::from_secs(config.timeout_secs),
            )?;
            Ok(Arc::new(client))
        }
    }
}

fn generate_endpoint(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix("/v1").unwrap_or(trimmed);
    if trimmed.ends_with("/api/generate") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/api/generate")
    }
}

/// Slice from the first `{` to the last `}`. Models often wrap JSON in prose or fences.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
