//! Client for a local Ollama server.
//!
//! Ollama speaks its own chat dialect: plain JSON in, newline-delimited
//! JSON events out when streaming. There is no authentication and no retry
//! loop; the server is local and either up or not, so failures surface
//! immediately with a hint to start it.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{QuillError, Result};
use crate::llm::types::Message;
use crate::llm::{transport_error, LlmClient};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MODEL: &str = "llama3.2:3b";
const CONNECT_HINT: &str = "Is Ollama running? Try: ollama serve";

/// Settings for one [`OllamaClient`].
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Server base URL without a trailing path.
    pub base_url: String,
    /// Model name, e.g. "llama3.2:3b".
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl OllamaConfig {
    /// Creates a config for a local server with the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Points the client at a remote server.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

/// Chat backend for a local Ollama instance.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

impl OllamaClient {
    /// Builds the client, applying the configured timeout.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QuillError::llm(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Probes the server without sending a completion.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        self.client.get(&url).send().await.is_ok()
    }

    /// Posts one chat request and checks the status.
    ///
    /// Both trait methods funnel through here, so transport and status
    /// failures are mapped in exactly one place.
    async fn post_chat(&self, messages: &[Message], stream: bool) -> Result<reqwest::Response> {
        let body = ChatRequest {
            model: self.config.model.clone(),
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            stream,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.config.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, CONNECT_HINT))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(QuillError::llm(format!(
                "Ollama error ({status}): {detail}"
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let response = self.post_chat(messages, false).await?;
        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| QuillError::llm(format!("Malformed Ollama response: {e}")))?;
        Ok(reply.message.content)
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
    ) -> Result<BoxStream<'static, Result<String>>> {
        let response = self.post_chat(messages, true).await?;

        let chunks = response.bytes_stream().filter_map(|read| async move {
            match read {
                Ok(bytes) => decode_events(&String::from_utf8_lossy(&bytes)).map(Ok),
                Err(e) => Some(Err(QuillError::llm(format!("Stream error: {e}")))),
            }
        });
        Ok(chunks.boxed())
    }
}

/// Extracts the text carried by one network read of the NDJSON stream.
///
/// A single read may hold several events; unparsable lines are skipped so a
/// stray log line from the server cannot kill the stream.
fn decode_events(chunk: &str) -> Option<String> {
    let mut text = String::new();

    for line in chunk.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Ok(event) = serde_json::from_str::<ChatReply>(line) {
            text.push_str(&event.message.content);
        }
    }

    (!text.is_empty()).then_some(text)
}

// Wire types for the Ollama chat dialect. The non-streaming reply and each
// streaming event share one shape.

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    message: WireMessage,
}
