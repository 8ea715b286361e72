//! Command registry.
//!
//! Maps command names to handlers plus their declared parsing contract.
//! Registration is append-only at startup: a duplicate name fails fast and
//! leaves the first registration active.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::engine::context::EngineContext;
use crate::engine::descriptor::{Descriptor, ParseMode};
use crate::error::{QuillError, Result};

/// Category for grouping commands in help output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCategory {
    /// General console commands.
    General,
    /// Variable management commands.
    Variables,
    /// Control-flow commands (try, silent, if, script).
    ControlFlow,
    /// Chat and LLM commands.
    Chat,
    /// System integration commands (shell, clipboard).
    System,
}

impl CommandCategory {
    /// Returns the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::General => "General commands",
            Self::Variables => "Variable commands",
            Self::ControlFlow => "Control flow",
            Self::Chat => "Chat commands",
            Self::System => "System commands",
        }
    }
}

/// Help metadata carried by every registry entry.
#[derive(Debug, Clone)]
pub struct CommandHelp {
    /// Short description shown in help.
    pub description: &'static str,
    /// Usage line, e.g. `\set[name=value, ...]`.
    pub usage: &'static str,
    /// Category for grouping in help.
    pub category: CommandCategory,
}

/// A registered command.
///
/// `execute` runs synchronously to completion (or to a blocking external
/// call) before control returns to the executor; handlers are total and
/// report failure through the returned `Result`, never by panicking.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Primary command name without the escape prefix.
    fn name(&self) -> &'static str;

    /// Declared parsing contract for this command's lines.
    fn parse_mode(&self) -> ParseMode {
        ParseMode::KeyValue
    }

    /// Help metadata for this command.
    fn help(&self) -> CommandHelp;

    /// Executes the command against the interpolated descriptor.
    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()>;
}

/// Name → handler mapping with O(1) lookup.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its own name.
    ///
    /// Fails if the name is already taken; the existing registration stays
    /// active.
    pub fn register(&mut self, handler: Arc<dyn CommandHandler>) -> Result<()> {
        let name = handler.name();
        if self.handlers.contains_key(name) {
            return Err(QuillError::internal(format!(
                "command '{name}' is already registered"
            )));
        }
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Looks up a handler by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn CommandHandler>> {
        self.handlers.get(name)
    }

    /// Returns the declared parse mode for a name, if registered.
    pub fn parse_mode(&self, name: &str) -> Option<ParseMode> {
        self.handlers.get(name).map(|h| h.parse_mode())
    }

    /// Returns every registered handler, sorted by name.
    pub fn handlers(&self) -> Vec<&Arc<dyn CommandHandler>> {
        let mut handlers: Vec<_> = self.handlers.values().collect();
        handlers.sort_by_key(|h| h.name());
        handlers
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubHandler {
        name: &'static str,
        marker: &'static str,
    }

    #[async_trait]
    impl CommandHandler for StubHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        fn help(&self) -> CommandHelp {
            CommandHelp {
                description: self.marker,
                usage: "",
                category: CommandCategory::General,
            }
        }

        async fn execute(&self, _ctx: &mut EngineContext, _desc: &Descriptor) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Arc::new(StubHandler {
                name: "echo",
                marker: "first",
            }))
            .unwrap();

        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.parse_mode("echo"), Some(ParseMode::KeyValue));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_fails_first_stays_active() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Arc::new(StubHandler {
                name: "echo",
                marker: "first",
            }))
            .unwrap();

        let err = registry
            .register(Arc::new(StubHandler {
                name: "echo",
                marker: "second",
            }))
            .unwrap_err();
        assert!(err.to_string().contains("already registered"));

        let active = registry.get("echo").unwrap();
        assert_eq!(active.help().description, "first");
    }

    #[test]
    fn test_handlers_sorted_by_name() {
        let mut registry = CommandRegistry::new();
        for name in ["vars", "echo", "set"] {
            registry
                .register(Arc::new(StubHandler { name, marker: "" }))
                .unwrap();
        }
        let names: Vec<_> = registry.handlers().iter().map(|h| h.name()).collect();
        assert_eq!(names, vec!["echo", "set", "vars"]);
    }

    #[test]
    fn test_category_display_name() {
        assert_eq!(CommandCategory::General.display_name(), "General commands");
        assert_eq!(CommandCategory::ControlFlow.display_name(), "Control flow");
    }
}
