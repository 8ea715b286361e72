//! The `echo` command.

use async_trait::async_trait;

use crate::engine::context::EngineContext;
use crate::engine::descriptor::{Descriptor, ParseMode};
use crate::engine::registry::{CommandCategory, CommandHandler, CommandHelp};
use crate::engine::vars::VAR_OUTPUT;
use crate::error::Result;
use crate::escape::unescape;

/// Emits its message after escape-sequence processing.
pub struct EchoCommand;

#[async_trait]
impl CommandHandler for EchoCommand {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn parse_mode(&self) -> ParseMode {
        ParseMode::Raw
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Print text",
            usage: "\\echo <text>",
            category: CommandCategory::General,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()> {
        let text = unescape(&desc.message);
        ctx.vars.set_system(VAR_OUTPUT, text.clone());
        ctx.emit_info(text);
        Ok(())
    }
}
