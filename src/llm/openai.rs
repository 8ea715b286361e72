//! Client for the OpenAI chat completions API.
//!
//! Any server speaking the same wire protocol works through the `url`
//! override, which is how drop-in gateways and self-hosted proxies are
//! pointed at. Both the blocking and the streaming path go through one
//! retrying request helper, so transient failures (rate limits, 5xx,
//! connection drops) are handled identically for either.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::{QuillError, Result};
use crate::llm::types::Message;
use crate::llm::{transport_error, LlmClient};

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
const CONNECT_HINT: &str = "Check your network and the configured endpoint URL.";

/// Transient failures are retried this many times, with doubling delays.
const MAX_ATTEMPTS: u32 = 3;
const BASE_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Settings for one [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Model name, e.g. "gpt-4o-mini".
    pub model: String,
    /// Chat completions endpoint.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Creates a config for the public endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            url: OPENAI_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Points the client at a compatible server.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Derives a config from the `[llm]` section of the config file.
    ///
    /// The API key itself never lives in the file; it is read from the
    /// environment variable named by `api_key_env` (default
    /// `OPENAI_API_KEY`).
    pub fn from_llm_config(config: &LlmConfig) -> Result<Self> {
        let key_env = config.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
        let api_key = std::env::var(key_env)
            .map_err(|_| QuillError::llm(format!("{key_env} environment variable not set")))?;

        let mut derived = Self::new(api_key, config.model.clone());
        if let Some(url) = &config.base_url {
            derived.url = url.clone();
        }
        if let Some(secs) = config.timeout_secs {
            derived.timeout_secs = secs;
        }
        Ok(derived)
    }
}

/// OpenAI-compatible chat backend.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiClient {
    /// Builds the client, applying the configured timeout.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QuillError::llm(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn request_body(&self, messages: &[Message], stream: bool) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: messages.iter().map(WireMessage::from).collect(),
            stream,
        }
    }

    /// Sends one chat request, retrying while the failure stays transient.
    ///
    /// Returns the raw 2xx response; every other outcome has been mapped to
    /// a [`QuillError`] by [`classify`] or [`transport_error`] before the
    /// retry decision is made.
    async fn send_with_retry(&self, body: &ChatRequest) -> Result<reqwest::Response> {
        let mut delay = BASE_RETRY_DELAY;
        let mut attempt = 1u32;

        loop {
            debug!(attempt, url = %self.config.url, "chat request");
            let outcome = self
                .client
                .post(&self.config.url)
                .bearer_auth(&self.config.api_key)
                .json(body)
                .send()
                .await;

            let (error, transient) = match outcome {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    classify(status, &body)
                }
                Err(e) => {
                    let transient = e.is_timeout() || e.is_connect();
                    (transport_error(e, CONNECT_HINT), transient)
                }
            };

            if !transient || attempt >= MAX_ATTEMPTS {
                return Err(error);
            }
            warn!(attempt, ?delay, "chat request failed, retrying: {error}");
            tokio::time::sleep(delay).await;
            delay *= 2;
            attempt += 1;
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let response = self
            .send_with_retry(&self.request_body(messages, false))
            .await?;

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| QuillError::llm(format!("Malformed API response: {e}")))?;

        reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| QuillError::llm("The API returned no choices"))
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
    ) -> Result<BoxStream<'static, Result<String>>> {
        let response = self
            .send_with_retry(&self.request_body(messages, true))
            .await?;

        let chunks = response.bytes_stream().filter_map(|read| async move {
            match read {
                Ok(bytes) => decode_sse(&String::from_utf8_lossy(&bytes)).map(Ok),
                Err(e) => Some(Err(QuillError::llm(format!("Stream error: {e}")))),
            }
        });
        Ok(chunks.boxed())
    }
}

/// Maps a non-success status to an error and whether a retry could help.
fn classify(status: StatusCode, body: &str) -> (QuillError, bool) {
    match status {
        StatusCode::UNAUTHORIZED => (
            QuillError::llm("Authentication failed. Check your API key."),
            false,
        ),
        StatusCode::TOO_MANY_REQUESTS => (
            QuillError::llm("Rate limited. Please wait and try again."),
            true,
        ),
        _ => {
            // The body usually carries a structured error; fall back to the
            // raw text when it does not.
            let detail = serde_json::from_str::<WireErrorBody>(body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("{status}: {body}"));
            (
                QuillError::llm(format!("API error: {detail}")),
                status.is_server_error(),
            )
        }
    }
}

/// Extracts the text carried by one network read of the SSE stream.
///
/// A single read may hold several `data:` events; their delta fragments are
/// concatenated. `[DONE]` ends the stream and comment lines carry nothing,
/// so a read with no text yields `None`.
fn decode_sse(chunk: &str) -> Option<String> {
    let mut text = String::new();

    for line in chunk.lines() {
        let Some(data) = line.trim().strip_prefix("data: ") else {
            continue;
        };
        if data == "[DONE]" {
            break;
        }
        if let Ok(event) = serde_json::from_str::<DeltaEvent>(data) {
            for choice in &event.choices {
                if let Some(fragment) = &choice.delta.content {
                    text.push_str(fragment);
                }
            }
        }
    }

    (!text.is_empty()).then_some(text)
}

// Wire types for the chat completions protocol.

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

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct DeltaEvent {
    choices: Vec<DeltaChoice>,
}

#[derive(Debug, Deserialize)]
struct DeltaChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    error: WireError,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
}
