//! Chat commands: `send` (the implicit command) and `clear`.

use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use crate::engine::context::EngineContext;
use crate::engine::descriptor::{Descriptor, ParseMode};
use crate::engine::registry::{CommandCategory, CommandHandler, CommandHelp};
use crate::engine::vars::VAR_OUTPUT;
use crate::error::{QuillError, Result};
use crate::llm::types::Message;

/// Forwards its message to the LLM backend and streams the reply.
///
/// Unprefixed input lines are routed here by the executor. The stream is
/// consumed to completion inside this dispatch; only then are the session
/// history and the positional projection updated.
pub struct SendCommand;

#[async_trait]
impl CommandHandler for SendCommand {
    fn name(&self) -> &'static str {
        "send"
    }

    fn parse_mode(&self) -> ParseMode {
        ParseMode::Raw
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Send a message to the assistant",
            usage: "\\send <message> (or any unprefixed line)",
            category: CommandCategory::Chat,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()> {
        if desc.message.trim().is_empty() {
            return Err(QuillError::dispatch("send requires a message"));
        }

        let mut messages = ctx.session.messages_for_llm();
        messages.push(Message::user(desc.message.clone()));

        let llm = ctx.llm.clone();
        let mut stream = llm.complete_stream(&messages).await?;

        let mut reply = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            ctx.emit_chunk(chunk.clone());
            reply.push_str(&chunk);
        }
        ctx.emit_chunk("\n");

        debug!(chars = reply.len(), "reply complete");
        ctx.vars.set_system(VAR_OUTPUT, reply.clone());
        ctx.session.push_user(desc.message.clone());
        ctx.session.push_assistant(reply);
        ctx.session.project_into(&mut ctx.vars);
        Ok(())
    }
}

/// Resets the chat session.
pub struct ClearCommand;

#[async_trait]
impl CommandHandler for ClearCommand {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn parse_mode(&self) -> ParseMode {
        ParseMode::Raw
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Start a fresh chat session",
            usage: "\\clear",
            category: CommandCategory::Chat,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, _desc: &Descriptor) -> Result<()> {
        ctx.reset_session();
        ctx.emit_info("Session cleared.");
        Ok(())
    }
}
