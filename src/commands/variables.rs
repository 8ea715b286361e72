//! Variable management commands: `set`, `get`, `unset`, `vars`.

use async_trait::async_trait;

use crate::engine::context::EngineContext;
use crate::engine::descriptor::{Descriptor, ParseMode};
use crate::engine::registry::{CommandCategory, CommandHandler, CommandHelp};
use crate::engine::vars::{Namespace, VAR_OUTPUT};
use crate::error::{QuillError, Result};

/// Stores each `key=value` option as a user variable.
pub struct SetCommand;

#[async_trait]
impl CommandHandler for SetCommand {
    fn name(&self) -> &'static str {
        "set"
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Set one or more variables",
            usage: "\\set[name=value, ...]",
            category: CommandCategory::Variables,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()> {
        if desc.options.is_empty() {
            return Err(QuillError::dispatch("set requires name=value arguments"));
        }

        let mut names: Vec<&str> = desc.options.keys().map(String::as_str).collect();
        names.sort_unstable();
        for name in names {
            let value = desc.option(name).to_string();
            ctx.vars.set(name, value.clone())?;
            ctx.emit_info(format!("{name} = {value}"));
        }
        Ok(())
    }
}

/// Emits the value of one variable and records it in `_output`.
pub struct GetCommand;

impl GetCommand {
    /// Resolves the variable name: `name=<var>`, or the first bare flag.
    fn target(desc: &Descriptor) -> Result<String> {
        if desc.has_option("name") {
            return Ok(desc.option("name").to_string());
        }
        let mut flags: Vec<&str> = desc
            .options
            .iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k.as_str())
            .collect();
        flags.sort_unstable();
        flags
            .first()
            .map(|s| s.to_string())
            .ok_or_else(|| QuillError::dispatch("get requires a variable name"))
    }
}

#[async_trait]
impl CommandHandler for GetCommand {
    fn name(&self) -> &'static str {
        "get"
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Print the value of a variable",
            usage: "\\get[name]",
            category: CommandCategory::Variables,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()> {
        let name = Self::target(desc)?;
        let value = ctx.vars.value(&name);
        ctx.vars.set_system(VAR_OUTPUT, value.clone());
        ctx.emit_info(value);
        Ok(())
    }
}

/// Removes user variables named by the options.
pub struct UnsetCommand;

#[async_trait]
impl CommandHandler for UnsetCommand {
    fn name(&self) -> &'static str {
        "unset"
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "Remove one or more variables",
            usage: "\\unset[name, ...]",
            category: CommandCategory::Variables,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, desc: &Descriptor) -> Result<()> {
        if desc.options.is_empty() {
            return Err(QuillError::dispatch("unset requires variable names"));
        }

        let mut names: Vec<&str> = desc.options.keys().map(String::as_str).collect();
        names.sort_unstable();
        for name in names {
            if Namespace::of(name) != Namespace::User {
                return Err(QuillError::dispatch(format!(
                    "'{name}' is a reserved variable name"
                )));
            }
            if ctx.vars.unset(name) {
                ctx.emit_info(format!("Unset {name}"));
            }
        }
        Ok(())
    }
}

/// Lists the defined variables.
pub struct VarsCommand;

#[async_trait]
impl CommandHandler for VarsCommand {
    fn name(&self) -> &'static str {
        "vars"
    }

    fn parse_mode(&self) -> ParseMode {
        ParseMode::Raw
    }

    fn help(&self) -> CommandHelp {
        CommandHelp {
            description: "List defined variables",
            usage: "\\vars",
            category: CommandCategory::Variables,
        }
    }

    async fn execute(&self, ctx: &mut EngineContext, _desc: &Descriptor) -> Result<()> {
        if ctx.vars.is_empty() {
            ctx.emit_info("No variables defined.");
            return Ok(());
        }

        let lines: Vec<String> = ctx
            .vars
            .names()
            .into_iter()
            .map(|name| {
                // Live environment entries are looked up on use; showing a
                // snapshot here would be misleading.
                if Namespace::of(name) == Namespace::Environment {
                    format!("{name} (live)")
                } else {
                    format!("{name} = {}", ctx.vars.value(name))
                }
            })
            .collect();
        for line in lines {
            ctx.emit_info(line);
        }
        Ok(())
    }
}
