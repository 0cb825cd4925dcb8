//! Mock completion service
//!
//! Deterministic stand-in for the hosted endpoint. Used by tests and by
//! `provider = "mock"` to run the UI without network access.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Error, Result};

use super::{ChatRole, CompletionReply, CompletionRequest, CompletionService};

const MOCK_URL: &str = "mock://completion";

/// Configuration for mock behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Fixed reply text (for deterministic testing)
    pub fixed_response: Option<String>,

    /// When set, every call fails with a timeout carrying this message
    pub failure: Option<String>,

    /// Reply without any content
    pub empty_reply: bool,
}

/// Mock implementation of `CompletionService`
pub struct MockService {
    config: MockConfig,
    requests: RwLock<Vec<CompletionRequest>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Echo the user's question back so offline runs show something useful
    fn generate_response(&self, request: &CompletionRequest) -> String {
        if let Some(ref fixed) = self.config.fixed_response {
            return fixed.clone();
        }

        let question = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.trim())
            .unwrap_or_default();

        format!("(mock) ご相談内容「{}」を受け付けました。", question)
    }
}

/// Canned behaviours and request inspection for tests
#[cfg(test)]
impl MockService {
    /// Always answer with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_config(MockConfig {
            fixed_response: Some(text.into()),
            ..Default::default()
        })
    }

    /// Always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig {
            failure: Some(message.into()),
            ..Default::default()
        })
    }

    /// Always reply without content
    pub fn contentless() -> Self {
        Self::with_config(MockConfig {
            empty_reply: true,
            ..Default::default()
        })
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.requests.read().len()
    }

    /// Copy of every request received, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().clone()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.read().last().cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for MockService {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply> {
        self.requests.write().push(request.clone());

        if let Some(ref message) = self.config.failure {
            return Err(Error::ConnectionTimeout {
                url: MOCK_URL.to_string(),
                message: message.clone(),
            });
        }

        if self.config.empty_reply {
            return Ok(CompletionReply::empty());
        }

        Ok(CompletionReply::text(self.generate_response(&request)))
    }
}
