//! The `bash` command: shell execution via `sh -c`.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::engine::context::EngineContext;
use crate::engine::descriptor::{Descriptor, ParseMode};
use crate::engine::registry::{CommandCategory, CommandHandler, CommandHelp};
use crate::engine::vars::VAR_OUTPUT;
use crate::error::{QuillError, Result};

/// Runs its message through the system shell.
pub struct BashCommand;

#[async_trait]
impl CommandHandler for BashCommand {
    fn name(&self) -> &'static str {
        "bash"
    }

    fn parse_mode(&self) -> ParseMode {
        ParseMode::Raw
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Run a shell command",
            usage: "\\bash <command>",
            category: CommandCategory::System,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()> {
        if desc.message.is_empty() {
            return Err(QuillError::dispatch("bash requires a command"));
        }

        debug!(command = %desc.message, "running shell command");
        let output = Command::new("sh")
            .arg("-c")
            .arg(&desc.message)
            .output()
            .await
            .map_err(|e| QuillError::shell(format!("Failed to run shell: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout)
            .trim_end_matches('\n')
            .to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr)
                .trim_end_matches('\n')
                .to_string();
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            let detail = if stderr.is_empty() {
                format!("exit status {code}")
            } else {
                format!("exit status {code}: {stderr}")
            };
            return Err(QuillError::shell(detail));
        }

        ctx.vars.set_system(VAR_OUTPUT, stdout.clone());
        if !stdout.is_empty() {
            ctx.emit_info(stdout);
        }
        Ok(())
    }
}
