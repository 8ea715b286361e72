//! The `script` command: loads a file of command lines onto the stack.

use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use crate::engine::context::EngineContext;
use crate::engine::descriptor::{Descriptor, ParseMode};
use crate::engine::registry::{CommandCategory, CommandHandler, CommandHelp};
use crate::error::{QuillError, Result};

/// Extracts the runnable lines of a script: blanks and `#` comments skipped.
pub fn script_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim_end)
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(String::from)
        .collect()
}

/// Loads a script file and stages its lines for execution.
pub struct ScriptCommand;

#[async_trait]
impl CommandHandler for ScriptCommand {
    fn name(&self) -> &'static str {
        "script"
    }

    fn parse_mode(&self) -> ParseMode {
        ParseMode::Raw
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Run a script file",
            usage: "\\script <path>",
            category: CommandCategory::ControlFlow,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()> {
        if desc.message.is_empty() {
            return Err(QuillError::dispatch("script requires a file path"));
        }

        let path = Path::new(&desc.message);
        let content = std::fs::read_to_string(path)
            .map_err(|e| QuillError::dispatch(format!("Failed to read script '{}': {e}", path.display())))?;

        let lines = script_lines(&content);
        info!(path = %path.display(), lines = lines.len(), "script loaded");

        // The stack is LIFO: the completion notice goes on first so it pops
        // last, then the lines in reverse so the first line pops first. The
        // notice is a Notice entry, not an echo, so it neither overwrites
        // `_output` nor passes the path through interpolation.
        ctx.stack
            .push_notice(format!("Script complete: {}", path.display()));
        for line in lines.iter().rev() {
            ctx.stack.push_command(line.clone());
        }
        Ok(())
    }
}
