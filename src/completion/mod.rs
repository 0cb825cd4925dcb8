//! Chat completion services
//!
//! The `CompletionService` trait is the seam between the dispatcher and the
//! hosted model. `create_service` builds the configured implementation once
//! at startup.

mod mock;
mod openai;
mod traits;

use std::sync::Arc;

use tracing::info;

use crate::config::{CompletionSettings, ProviderKind};
use crate::error::Result;

pub use mock::MockService;
pub use openai::{OpenAiConfig, OpenAiService};
pub use traits::*;

/// Build the completion service selected by `settings.provider`
pub fn create_service(settings: &CompletionSettings) -> Result<SharedCompletionService> {
    let service: SharedCompletionService = match settings.provider {
        ProviderKind::OpenAi => Arc::new(OpenAiService::new(OpenAiConfig::from(settings))?),
        ProviderKind::Mock => Arc::new(MockService::new()),
    };

    info!(provider = service.name(), "Completion service ready");
    Ok(service)
}
