//! Consultation dispatcher
//!
//! Turns a question plus a persona id into one completion request and folds
//! every outcome of that request into displayable text. The only error that
//! escapes is `UnknownPersona`, raised before anything is sent.

use std::time::Instant;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::completion::{ChatMessage, CompletionRequest, SharedCompletionService};
use crate::error::Result;
use crate::persona::{PersonaDefinition, PersonaRegistry};

/// Prefix of every completion failure shown to the user
pub const ERROR_PREFIX: &str = "エラーが発生しました";

/// Shown when the model replied without any content
pub const NO_CONTENT_PLACEHOLDER: &str = "AIからの回答を取得できませんでした。";

/// Shown by the UI layers for blank input; no request is made
pub const EMPTY_INPUT_WARNING: &str = "相談内容を入力してください。";

/// Sampling temperature for every consultation
pub const TEMPERATURE: f32 = 0.7;

/// A validated consultation: the persona is already resolved
#[derive(Debug, Clone)]
pub struct ConsultationRequest {
    pub user_text: String,
    pub persona: &'static PersonaDefinition,
}

impl ConsultationRequest {
    /// Resolve `persona_id` against the registry
    pub fn new(user_text: impl Into<String>, persona_id: &str) -> Result<Self> {
        Ok(Self {
            user_text: user_text.into(),
            persona: PersonaRegistry::new().lookup(persona_id)?,
        })
    }

    /// `[system: instruction, user: text]`, nothing else
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.persona.instruction),
            ChatMessage::user(self.user_text.clone()),
        ]
    }
}

/// Outcome of one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consultation {
    /// Content returned by the model, verbatim
    Answer(String),
    /// Placeholder or prefixed error text
    Failure(String),
}

impl Consultation {
    pub fn into_text(self) -> String {
        match self {
            Consultation::Answer(text) | Consultation::Failure(text) => text,
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, Consultation::Answer(_))
    }
}

/// Sends consultations to the shared completion service
///
/// Holds no per-request state; one instance serves every caller.
pub struct Dispatcher {
    service: SharedCompletionService,
    registry: PersonaRegistry,
}

impl Dispatcher {
    pub fn new(service: SharedCompletionService) -> Self {
        Self {
            service,
            registry: PersonaRegistry::new(),
        }
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    /// Answer `user_text` as persona `persona_id`
    ///
    /// Completion failures come back as `Ok` text starting with
    /// `エラーが発生しました: `. Blank input is forwarded as-is.
    pub async fn respond(&self, user_text: &str, persona_id: &str) -> Result<String> {
        let request = ConsultationRequest {
            user_text: user_text.to_string(),
            persona: self.registry.lookup(persona_id)?,
        };
        Ok(self.dispatch(&request).await.into_text())
    }

    /// Run one completion call and classify the result
    pub async fn dispatch(&self, request: &ConsultationRequest) -> Consultation {
        let request_id = Uuid::new_v4();
        let persona = request.persona.id.slug();
        let started = Instant::now();

        debug!(
            request_id = %request_id,
            persona,
            question = %request.user_text,
            "Dispatching consultation"
        );

        let completion = CompletionRequest {
            messages: request.messages(),
            temperature: TEMPERATURE,
        };

        let outcome = match self.service.complete(completion).await {
            Ok(reply) => match reply.content {
                Some(content) => Consultation::Answer(content),
                None => {
                    warn!(request_id = %request_id, persona, "Completion returned no content");
                    Consultation::Failure(NO_CONTENT_PLACEHOLDER.to_string())
                }
            },
            Err(e) => {
                if e.is_completion_error() {
                    warn!(
                        request_id = %request_id,
                        persona,
                        error = %e.format_for_log(),
                        "Completion failed"
                    );
                } else {
                    error!(
                        request_id = %request_id,
                        persona,
                        error = %e.format_for_log(),
                        "Completion service error"
                    );
                }
                Consultation::Failure(format!("{}: {}", ERROR_PREFIX, e))
            }
        };

        info!(
            request_id = %request_id,
            persona,
            provider = self.service.name(),
            answered = outcome.is_answer(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Consultation finished"
        );

        outcome
    }
}

/// True when the input should get the warning instead of a request
pub fn is_blank(user_text: &str) -> bool {
    user_text.trim().is_empty()
}
