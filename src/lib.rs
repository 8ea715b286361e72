//! Quill - a scriptable, AI-first command console.
//!
//! Input lines are either backslash-prefixed commands (optionally carrying
//! bracketed `key=value` arguments) or plain text forwarded to an LLM
//! backend. Commands run off an execution stack with `try`/`silent`
//! boundary regions; `${...}` placeholders interpolate variables across
//! several namespaces.

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod escape;
pub mod llm;
pub mod logging;
pub mod session;
