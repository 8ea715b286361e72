//! Control-flow commands: `try`, `silent`, `if`.

use async_trait::async_trait;
use tracing::debug;

use crate::engine::context::EngineContext;
use crate::engine::descriptor::{Descriptor, ParseMode};
use crate::engine::registry::{CommandCategory, CommandHandler, CommandHelp};
use crate::engine::stack::BoundaryKind;
use crate::engine::vars::VAR_CONDITION;
use crate::error::{QuillError, Result};

/// Wraps its message command in an error boundary.
///
/// A failure of the wrapped command is recorded in `_status`/`_error` but
/// does not halt the run.
pub struct TryCommand;

#[async_trait]
impl CommandHandler for TryCommand {
    fn name(&self) -> &'static str {
        "try"
    }

    fn parse_mode(&self) -> ParseMode {
        ParseMode::Raw
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Run a command, absorbing its failure",
            usage: "\\try <command>",
            category: CommandCategory::ControlFlow,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()> {
        if desc.raw_message.is_empty() {
            return Err(QuillError::dispatch("try requires a command"));
        }
        // Stage the uninterpolated text: the staged line is interpolated
        // when it runs, and doing it here as well would rescan placeholder
        // text inside substituted values.
        let id = ctx.stack.push_wrapped(BoundaryKind::Error, &desc.raw_message);
        debug!(id, "error boundary staged");
        Ok(())
    }
}

/// Wraps its message command in a silent boundary.
///
/// Non-error output of the wrapped command is suppressed; errors stay
/// visible.
pub struct SilentCommand;

#[async_trait]
impl CommandHandler for SilentCommand {
    fn name(&self) -> &'static str {
        "silent"
    }

    fn parse_mode(&self) -> ParseMode {
        ParseMode::Raw
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Run a command without its normal output",
            usage: "\\silent <command>",
            category: CommandCategory::ControlFlow,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()> {
        if desc.raw_message.is_empty() {
            return Err(QuillError::dispatch("silent requires a command"));
        }
        let id = ctx.stack.push_wrapped(BoundaryKind::Silent, &desc.raw_message);
        debug!(id, "silent boundary staged");
        Ok(())
    }
}

/// Conditionally stages its message on the conditional queue.
///
/// `left`/`right` are compared with `op`; on true the message is enqueued.
/// The boolean lands in `_condition` either way.
pub struct IfCommand;

impl IfCommand {
    fn evaluate(desc: &Descriptor) -> Result<bool> {
        let left = desc.option("left");
        let right = desc.option("right");
        match desc.option("op") {
            "eq" => Ok(left == right),
            "ne" => Ok(left != right),
            "contains" => Ok(left.contains(right)),
            "empty" => Ok(left.is_empty()),
            "nonempty" => Ok(!left.is_empty()),
            "" => Err(QuillError::dispatch(
                "if requires an op option (eq, ne, contains, empty, nonempty)",
            )),
            other => Err(QuillError::dispatch(format!("unknown if op '{other}'"))),
        }
    }
}

#[async_trait]
impl CommandHandler for IfCommand {
    fn name(&self) -> &'static str {
        "if"
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Run a command when a condition holds",
            usage: "\\if[left=a, op=eq, right=b] <command>",
            category: CommandCategory::ControlFlow,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()> {
        let holds = Self::evaluate(desc)?;
        ctx.vars
            .set_system(VAR_CONDITION, if holds { "1" } else { "0" });
        debug!(holds, "condition evaluated");

        if holds && !desc.raw_message.is_empty() {
            ctx.queue.push_back(&desc.raw_message);
        }
        Ok(())
    }
}
