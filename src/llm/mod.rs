//! LLM integration for Quill.
//!
//! Provides the client trait and implementations for the chat backend the
//! `send` command talks to.

pub mod mock;
pub mod ollama;
pub mod openai;
pub mod types;

pub use mock::MockLlmClient;
pub use ollama::{OllamaClient, OllamaConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use types::{Message, Role};

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::config::LlmConfig;
use crate::error::{QuillError, Result};

/// Trait for LLM clients that can generate completions.
///
/// Implementations must be thread-safe (Send + Sync) to support async
/// operations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates a completion for the given messages.
    ///
    /// Returns the complete response as a single string.
    async fn complete(&self, messages: &[Message]) -> Result<String>;

    /// Generates a streaming completion for the given messages.
    ///
    /// Returns a stream of response chunks as they arrive.
    async fn complete_stream(
        &self,
        messages: &[Message],
    ) -> Result<BoxStream<'static, Result<String>>>;
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// OpenAI-compatible API (GPT models and drop-in servers).
    #[default]
    OpenAi,
    /// Local Ollama instance.
    Ollama,
    /// Mock client for testing (no API key required).
    Mock,
}

impl LlmProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown LLM provider: {}", s)),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps a transport-level request failure to a user-facing error.
///
/// Shared by every HTTP-backed client so timeouts and connection failures
/// read the same regardless of provider; `connect_hint` tells the user what
/// to check for this particular backend.
pub(crate) fn transport_error(e: reqwest::Error, connect_hint: &str) -> QuillError {
    if e.is_timeout() {
        QuillError::llm("Request timed out. Try again.")
    } else if e.is_connect() {
        QuillError::llm(format!("Connection failed. {connect_hint}"))
    } else {
        QuillError::llm(format!("Request failed: {e}"))
    }
}

/// Builds a client for the configured provider.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    let provider = config
        .provider
        .parse::<LlmProvider>()
        .map_err(QuillError::config)?;

    let client: Arc<dyn LlmClient> = match provider {
        LlmProvider::OpenAi => Arc::new(OpenAiClient::new(OpenAiConfig::from_llm_config(config)?)?),
        LlmProvider::Ollama => {
            let mut ollama = OllamaConfig::new(config.model.clone());
            if let Some(url) = &config.base_url {
                ollama = ollama.with_url(url.clone());
            }
            if let Some(secs) = config.timeout_secs {
                ollama = ollama.with_timeout(secs);
            }
            Arc::new(OllamaClient::new(ollama)?)
        }
        LlmProvider::Mock => Arc::new(MockLlmClient::new()),
    };
    Ok(client)
}
