//! Chat session state.
//!
//! Holds the conversation history sent to the LLM and projects it into the
//! variable store: positional names (`1` is the most recent message) and
//! `#`-prefixed session metadata.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::vars::VariableStore;
use crate::llm::types::Message;

/// Default system prompt for the chat backend.
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant running inside an interactive console. \
     Answer concisely in plain text.";

/// Conversation history plus session metadata.
#[derive(Debug, Clone)]
pub struct ChatSession {
    system_prompt: String,
    messages: Vec<Message>,
    session_id: String,
    model: String,
}

impl ChatSession {
    /// Creates an empty session with a fresh id.
    pub fn new() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            messages: Vec::new(),
            session_id: generate_session_id(),
            model: String::new(),
        }
    }

    /// Replaces the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Records the model name for `#model` projection.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    /// Returns the session id.
    pub fn id(&self) -> &str {
        &self.session_id
    }

    /// Appends a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Appends an assistant message.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Returns the history as sent to the backend: system prompt first,
    /// then the conversation in order.
    pub fn messages_for_llm(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(self.messages.iter().cloned());
        messages
    }

    /// Returns the conversation history (system prompt excluded).
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages in the history.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Clears the history and issues a new session id.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.session_id = generate_session_id();
    }

    /// Publishes the session into the variable store.
    ///
    /// Positional names count back from the end of the history: `1` is the
    /// most recent message, `2` the one before it. Stale positions from a
    /// longer previous history are removed first.
    pub fn project_into(&self, vars: &mut VariableStore) {
        vars.clear_positional();
        for (i, message) in self.messages.iter().rev().enumerate() {
            vars.set_system((i + 1).to_string().as_str(), message.content.clone());
        }
        vars.set_system("#message_count", self.messages.len().to_string());
        vars.set_system("#session_id", self.session_id.clone());
        vars.set_system("#model", self.model.clone());
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_session_id() -> String {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros())
        .unwrap_or(0);
    format!("session-{micros}")
}
