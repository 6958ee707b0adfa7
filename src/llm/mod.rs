//! LLM Provider Module
//!
//! Completion client abstraction and the startup-selected backend. When no API
//! key is configured the service runs in mock mode and never calls a provider.

pub mod openai;
pub mod prompt;

pub use openai::OpenAiCompatibleClient;
pub use prompt::system_instruction;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::LlmConfig;
use crate::error::Result;

/// A chat completion provider
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one system instruction and one user message, return the completion text
    async fn complete(&self, system_instruction: &str, user_message: &str) -> Result<String>;

    /// Model identifier used for requests
    fn model(&self) -> &str;
}

/// Backend selected once at startup and injected into the chat service
#[derive(Clone)]
pub enum LlmBackend {
    /// A real provider client
    Configured(Arc<dyn CompletionClient>),
    /// No credentials, replies are fixed placeholders
    MockMode,
}

impl LlmBackend {
    /// Build the backend from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        if !config.has_api_key() {
            warn!("No LLM API key configured (set GROQ_API_KEY), AI will be in mock mode");
            return Ok(LlmBackend::MockMode);
        }

        let client = OpenAiCompatibleClient::from_config(config)?;
        info!(
            "LLM client configured: {} (model: {})",
            config.base_url, config.model
        );
        Ok(LlmBackend::Configured(Arc::new(client)))
    }

    /// "configured" or "mock"
    pub fn mode(&self) -> &'static str {
        match self {
            LlmBackend::Configured(_) => "configured",
            LlmBackend::MockMode => "mock",
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, LlmBackend::MockMode)
    }
}

impl fmt::Debug for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmBackend::Configured(client) => f
                .debug_tuple("Configured")
                .field(&client.model())
                .finish(),
            LlmBackend::MockMode => f.write_str("MockMode"),
        }
    }
}
