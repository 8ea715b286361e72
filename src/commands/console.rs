//! Console commands: `help` and `exit`/`quit`.

use async_trait::async_trait;

use crate::engine::context::EngineContext;
use crate::engine::descriptor::{Descriptor, ParseMode};
use crate::engine::registry::{CommandCategory, CommandHandler, CommandHelp};
use crate::error::{QuillError, Result};

/// Category order used when rendering grouped help.
const CATEGORY_ORDER: [CommandCategory; 5] = [
    CommandCategory::General,
    CommandCategory::Chat,
    CommandCategory::Variables,
    CommandCategory::ControlFlow,
    CommandCategory::System,
];

/// Renders help from a snapshot of the registry's metadata.
///
/// The snapshot is taken at registration time; the registry is append-only
/// at startup, so it cannot go stale.
pub struct HelpCommand {
    entries: Vec<(&'static str, CommandHelp)>,
}

impl HelpCommand {
    /// Creates the handler from registry metadata, adding its own entry.
    pub fn new(mut entries: Vec<(&'static str, CommandHelp)>) -> Self {
        entries.push(("help", Self::own_help()));
        entries.sort_by_key(|(name, _)| *name);
        Self { entries }
    }

    fn own_help() -> CommandHelp {
        CommandHelp {
            description: "Show this help, or help for one command",
            usage: "\\help [command]",
            category: CommandCategory::General,
        }
    }

    fn render_all(&self) -> String {
        let mut out = String::new();
        for category in CATEGORY_ORDER {
            let group: Vec<_> = self
                .entries
                .iter()
                .filter(|(_, help)| help.category == category)
                .collect();
            if group.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(category.display_name());
            out.push('\n');
            for (_, help) in group {
                out.push_str(&format!("  {:<36} {}\n", help.usage, help.description));
            }
        }
        out.trim_end().to_string()
    }

    fn render_one(&self, name: &str) -> Result<String> {
        let (_, help) = self
            .entries
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| QuillError::unknown(name.to_string()))?;
        Ok(format!("{}\n  usage: {}", help.description, help.usage))
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn parse_mode(&self) -> ParseMode {
        ParseMode::Raw
    }

    fn help(&self) -> CommandHelp {
        Self::own_help()
    }

    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()> {
        let name = desc.message.trim();
        let text = if name.is_empty() {
            self.render_all()
        } else {
            self.render_one(name.trim_start_matches('\\'))?
        };
        ctx.emit_info(text);
        Ok(())
    }
}

/// Requests console exit. Registered as both `exit` and `quit`.
pub struct ExitCommand {
    name: &'static str,
}

impl ExitCommand {
    /// Creates the handler under the given alias.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl CommandHandler for ExitCommand {
    fn name(&self) -> &'static str {
        self.name
    }

    fn parse_mode(&self) -> ParseMode {
        ParseMode::Raw
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Leave the console",
            usage: "\\exit",
            category: CommandCategory::General,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, _desc: &Descriptor) -> Result<()> {
        ctx.exit_requested = true;
        ctx.emit_info("Goodbye!");
        Ok(())
    }
}
