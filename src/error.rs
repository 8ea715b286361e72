//! Error types for Quill.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for Quill operations.
#[derive(Error, Debug)]
pub enum QuillError {
    /// Parse errors (malformed bracket or quote syntax in an input line).
    #[error("Parse error: {0}")]
    Parse(String),

    /// The command name is not present in the registry.
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// A handler returned a failure during dispatch.
    #[error("Command error: {0}")]
    Dispatch(String),

    /// Shell execution errors (spawn failure, nonzero exit, etc.).
    #[error("Shell error: {0}")]
    Shell(String),

    /// LLM API errors (rate limits, auth, timeouts, etc.).
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration errors (invalid config file, missing required fields, etc.).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuillError {
    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Creates an unknown-command error for the given name.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::Unknown(name.into())
    }

    /// Creates a dispatch error with the given message.
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }

    /// Creates a shell error with the given message.
    pub fn shell(msg: impl Into<String>) -> Self {
        Self::Shell(msg.into())
    }

    /// Creates an LLM error with the given message.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Parse(_) => "Parse Error",
            Self::Unknown(_) => "Unknown Command",
            Self::Dispatch(_) => "Command Error",
            Self::Shell(_) => "Shell Error",
            Self::Llm(_) => "LLM Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns true if this is a parse error.
    ///
    /// Parse errors are reported but never halt a run; dispatch-class
    /// errors halt the run when no error boundary is open.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Result type alias using QuillError.
pub type Result<T> = std::result::Result<T, QuillError>;
