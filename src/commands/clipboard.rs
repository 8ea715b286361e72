//! Clipboard commands: `copy` and `paste`.

use arboard::Clipboard;
use async_trait::async_trait;

use crate::engine::context::EngineContext;
use crate::engine::descriptor::{Descriptor, ParseMode};
use crate::engine::registry::{CommandCategory, CommandHandler, CommandHelp};
use crate::engine::vars::VAR_OUTPUT;
use crate::error::{QuillError, Result};

fn open_clipboard() -> Result<Clipboard> {
    Clipboard::new().map_err(|e| QuillError::dispatch(format!("Clipboard unavailable: {e}")))
}

/// Copies text to the system clipboard.
///
/// With an empty message, copies `_output` (the last command's result).
pub struct CopyCommand;

#[async_trait]
impl CommandHandler for CopyCommand {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn parse_mode(&self) -> ParseMode {
        ParseMode::Raw
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Copy text (or the last output) to the clipboard",
            usage: "\\copy [text]",
            category: CommandCategory::System,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()> {
        let text = if desc.message.is_empty() {
            ctx.vars.value(VAR_OUTPUT)
        } else {
            desc.message.clone()
        };
        if text.is_empty() {
            return Err(QuillError::dispatch("nothing to copy"));
        }

        let mut clipboard = open_clipboard()?;
        clipboard
            .set_text(text.clone())
            .map_err(|e| QuillError::dispatch(format!("Failed to copy: {e}")))?;
        ctx.emit_info(format!("Copied {} characters to clipboard.", text.len()));
        Ok(())
    }
}

/// Reads the system clipboard into `_output`.
pub struct PasteCommand;

#[async_trait]
impl CommandHandler for PasteCommand {
    fn name(&self) -> &'static str {
        "paste"
    }

    fn parse_mode(&self) -> ParseMode {
        ParseMode::Raw
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Print the clipboard contents",
            usage: "\\paste",
            category: CommandCategory::System,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, _desc: &Descriptor) -> Result<()> {
        let mut clipboard = open_clipboard()?;
        let text = clipboard
            .get_text()
            .map_err(|e| QuillError::dispatch(format!("Failed to paste: {e}")))?;
        ctx.vars.set_system(VAR_OUTPUT, text.clone());
        ctx.emit_info(text);
        Ok(())
    }
}
