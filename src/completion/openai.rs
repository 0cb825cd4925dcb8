//! OpenAI-compatible chat completion client
//!
//! Talks to any endpoint implementing `POST {base_url}/chat/completions`
//! (OpenAI, Ollama, vLLM, LM Studio, etc.). One request per call, no retries.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::CompletionSettings;
use crate::error::{Error, Result};

use super::{ChatMessage, CompletionReply, CompletionRequest, CompletionService};

// ─────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────

/// Configuration for the OpenAI-compatible client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API base URL (e.g., "https://api.openai.com/v1")
    pub base_url: String,

    /// API key (empty string for local servers like Ollama)
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Request timeout in seconds; `None` keeps the HTTP client default
    pub timeout_secs: Option<u64>,
}

impl From<&CompletionSettings> for OpenAiConfig {
    fn from(settings: &CompletionSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            timeout_secs: settings.timeout_secs,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// `{"error": {"message": "..."}}` body returned on failures
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ─────────────────────────────────────────────────────────────────
// OpenAI Service
// ─────────────────────────────────────────────────────────────────

/// OpenAI-compatible completion service
pub struct OpenAiService {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiService {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            authenticated = !config.api_key.is_empty(),
            "OpenAI-compatible completion service created"
        );

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the authorization header value (if API key is set)
    fn auth_header(&self) -> Option<String> {
        if self.config.api_key.is_empty() {
            None
        } else {
            Some(format!("Bearer {}", self.config.api_key))
        }
    }

    fn map_send_error(&self, url: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::ConnectionTimeout {
                url: url.to_string(),
                message: e.to_string(),
            }
        } else if e.is_connect() {
            Error::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            }
        } else {
            Error::CompletionFailed {
                status: None,
                message: e.to_string(),
            }
        }
    }
}

/// Map a non-success HTTP status to an error, preferring the API's own message
fn status_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        401 | 403 => Error::AuthenticationFailed { message },
        429 => Error::RateLimited { message },
        _ => Error::CompletionFailed {
            status: Some(status),
            message,
        },
    }
}

#[async_trait]
impl CompletionService for OpenAiService {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply> {
        let url = self.endpoint();
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            temperature: request.temperature,
        };

        let mut req = self.client.post(&url).json(&body);
        if let Some(ref auth) = self.auth_header() {
            req = req.header("Authorization", auth);
        }

        debug!(url = %url, messages = request.messages.len(), "Sending chat completion");
        let response = req.send().await.map_err(|e| self.map_send_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &text));
        }

        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| Error::MalformedResponse {
                message: e.to_string(),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);

        Ok(CompletionReply { content })
    }
}
