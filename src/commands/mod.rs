//! Built-in commands.
//!
//! Each submodule holds a group of related handlers; [`register_builtins`]
//! installs them all into a registry at startup.

pub mod chat;
pub mod clipboard;
pub mod console;
pub mod control;
pub mod echo;
pub mod script;
pub mod shell;
pub mod variables;

use std::sync::Arc;

use crate::engine::registry::CommandRegistry;
use crate::error::Result;

/// Registers every built-in command.
///
/// `help` goes in last with a snapshot of the other entries' metadata.
pub fn register_builtins(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(Arc::new(variables::SetCommand))?;
    registry.register(Arc::new(variables::GetCommand))?;
    registry.register(Arc::new(variables::UnsetCommand))?;
    registry.register(Arc::new(variables::VarsCommand))?;
    registry.register(Arc::new(echo::EchoCommand))?;
    registry.register(Arc::new(shell::BashCommand))?;
    registry.register(Arc::new(control::TryCommand))?;
    registry.register(Arc::new(control::SilentCommand))?;
    registry.register(Arc::new(control::IfCommand))?;
    registry.register(Arc::new(script::ScriptCommand))?;
    registry.register(Arc::new(chat::SendCommand))?;
    registry.register(Arc::new(chat::ClearCommand))?;
    registry.register(Arc::new(clipboard::CopyCommand))?;
    registry.register(Arc::new(clipboard::PasteCommand))?;
    registry.register(Arc::new(console::ExitCommand::named("exit")))?;
    registry.register(Arc::new(console::ExitCommand::named("quit")))?;

    let entries: Vec<_> = registry
        .handlers()
        .iter()
        .map(|h| (h.name(), h.help()))
        .collect();
    registry.register(Arc::new(console::HelpCommand::new(entries)))?;
    Ok(())
}
