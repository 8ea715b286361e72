//! Variable store for Quill.
//!
//! One mapping, name → string value, where the name's prefix discriminates
//! the namespace: bare names are user variables, `_` marks system/computed
//! values, `#` marks session metadata, `@` marks environment-like live
//! values, and pure-digit names reference message history positions.

use std::collections::HashMap;

/// Status of the most recent dispatch: "0" on success, "1" on failure.
pub const VAR_STATUS: &str = "_status";
/// Error message of the most recent failing dispatch, empty on success.
pub const VAR_ERROR: &str = "_error";
/// Output of the most recent producing command.
pub const VAR_OUTPUT: &str = "_output";
/// Snapshot of `_status` taken when an error boundary opens.
pub const VAR_LAST_STATUS: &str = "_last_status";
/// Snapshot of `_error` taken when an error boundary opens.
pub const VAR_LAST_ERROR: &str = "_last_error";
/// Boolean result of the most recent `if` evaluation.
pub const VAR_CONDITION: &str = "_condition";

/// Namespace of a variable name, derived from its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Bare name set by the user.
    User,
    /// `_`-prefixed system/computed value.
    System,
    /// `#`-prefixed session/runtime metadata.
    Session,
    /// `@`-prefixed environment-like live value.
    Environment,
    /// Pure-digit positional message-history reference.
    Positional,
}

impl Namespace {
    /// Derives the namespace from a variable name.
    pub fn of(name: &str) -> Self {
        if name.starts_with('_') {
            Self::System
        } else if name.starts_with('#') {
            Self::Session
        } else if name.starts_with('@') {
            Self::Environment
        } else if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
            Self::Positional
        } else {
            Self::User
        }
    }
}

/// Session-wide store of named string values.
///
/// Lookup of an undefined name returns the empty string, never an error.
/// Write validation of reserved names happens in [`VariableStore::set`];
/// owning collaborators use [`VariableStore::set_system`] to bypass it.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    vars: HashMap<String, String>,
}

impl VariableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value and whether the name was found.
    ///
    /// `@`-prefixed names fall through to the live process environment when
    /// not present in the store.
    pub fn get(&self, name: &str) -> (String, bool) {
        if let Some(value) = self.vars.get(name) {
            return (value.clone(), true);
        }
        if let Some(var) = name.strip_prefix('@') {
            if let Ok(value) = std::env::var(var) {
                return (value, true);
            }
        }
        (String::new(), false)
    }

    /// Returns the value, or the empty string when undefined.
    pub fn value(&self, name: &str) -> String {
        self.get(name).0
    }

    /// Sets a user variable.
    ///
    /// Names in reserved namespaces (`_`, `#`, `@`, pure-digit) are rejected.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> crate::error::Result<()> {
        if name.is_empty() {
            return Err(crate::error::QuillError::dispatch(
                "variable name must not be empty",
            ));
        }
        match Namespace::of(name) {
            Namespace::User => {
                self.vars.insert(name.to_string(), value.into());
                Ok(())
            }
            _ => Err(crate::error::QuillError::dispatch(format!(
                "'{name}' is a reserved variable name"
            ))),
        }
    }

    /// Sets any variable, bypassing user-name validation.
    ///
    /// Used by the executor and owning collaborators for `_`, `#`, `@` and
    /// positional entries.
    pub fn set_system(&mut self, name: &str, value: impl Into<String>) {
        self.vars.insert(name.to_string(), value.into());
    }

    /// Removes a variable. Returns true if it was present.
    pub fn unset(&mut self, name: &str) -> bool {
        self.vars.remove(name).is_some()
    }

    /// Removes every positional entry (pure-digit names).
    ///
    /// Called by the history projection before it re-publishes, so stale
    /// positions from a longer previous history do not linger.
    pub fn clear_positional(&mut self) {
        self.vars
            .retain(|name, _| Namespace::of(name) != Namespace::Positional);
    }

    /// Returns all defined names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.vars.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of defined variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true when no variable is defined.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Clears the whole store (explicit session reset only).
    pub fn reset(&mut self) {
        self.vars.clear();
    }
}
