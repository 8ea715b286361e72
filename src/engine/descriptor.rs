//! Command descriptors.
//!
//! A descriptor is the parsed representation of one input line. It is created
//! by the parser, interpolated once, and consumed by the executor.

use std::collections::HashMap;

/// The command-escape prefix recognized at the start of a line.
pub const COMMAND_PREFIX: char = '\\';

/// How a command's arguments are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Bracket content and message are decomposed into key=value options.
    #[default]
    KeyValue,
    /// The message is passed through untouched (shell text, control-flow
    /// bodies, free-form echo).
    Raw,
}

/// Parsed representation of one input line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Descriptor {
    /// Command name without the escape prefix.
    pub name: String,
    /// Parse mode the descriptor was built with.
    pub parse_mode: ParseMode,
    /// Verbatim `[...]` content, if the line carried a bracket group.
    pub bracket_content: Option<String>,
    /// Options decomposed from the bracket content (KeyValue mode only).
    /// Duplicate keys: last one wins.
    pub options: HashMap<String, String>,
    /// Message tail following the name/bracket group.
    pub message: String,
    /// Message tail exactly as parsed, before interpolation.
    ///
    /// Handlers that re-stage their message (`try`, `silent`, `if`) push
    /// this form, so staged text is interpolated exactly once when the
    /// staged line itself runs.
    pub raw_message: String,
}

impl Descriptor {
    /// Returns the value of an option, or the empty string when absent.
    pub fn option(&self, key: &str) -> &str {
        self.options.get(key).map(String::as_str).unwrap_or("")
    }

    /// Returns true if the option is present (including bare flags).
    pub fn has_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }
}
