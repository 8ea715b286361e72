//! The execution engine.
//!
//! A state machine that drains the execution stack and the conditional
//! queue, opens and closes boundary regions, and dispatches commands through
//! the registry. Failures never propagate as Rust errors across the
//! containers: they are funneled through `_status`/`_error` so the core and
//! the control-flow commands observe them identically.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::engine::context::EngineContext;
use crate::engine::descriptor::{Descriptor, ParseMode};
use crate::engine::interpolate::interpolate;
use crate::engine::parser;
use crate::engine::registry::CommandRegistry;
use crate::engine::stack::{BoundaryKind, StackEntry};
use crate::engine::vars::{VAR_ERROR, VAR_LAST_ERROR, VAR_LAST_STATUS, VAR_STATUS};
use crate::error::{QuillError, Result};

/// Name of the implicit command receiving unprefixed lines.
pub const IMPLICIT_COMMAND: &str = "send";

/// State of the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutorState {
    /// Nothing pending.
    #[default]
    Idle,
    /// Draining the stack/queue.
    Running,
    /// A dispatch failed outside any error boundary. Terminal for the run.
    HaltedOnError,
}

/// The executor: registry plus context plus drain loop.
pub struct Engine {
    registry: CommandRegistry,
    ctx: EngineContext,
    state: ExecutorState,
    open_boundaries: Vec<(BoundaryKind, u64)>,
}

impl Engine {
    /// Creates an engine around a populated registry and context.
    pub fn new(registry: CommandRegistry, ctx: EngineContext) -> Self {
        Self {
            registry,
            ctx,
            state: ExecutorState::Idle,
            open_boundaries: Vec::new(),
        }
    }

    /// Current executor state.
    pub fn state(&self) -> ExecutorState {
        self.state
    }

    /// Read access to the engine context.
    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Mutable access to the engine context.
    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    /// Returns true once a handler has requested console exit.
    pub fn exit_requested(&self) -> bool {
        self.ctx.exit_requested
    }

    /// Pushes one input line and drains until both containers are empty.
    pub async fn submit_line(&mut self, line: &str) -> ExecutorState {
        let line = line.trim_end();
        if line.trim().is_empty() {
            return self.state;
        }
        self.ctx.stack.push_command(line);
        self.run().await
    }

    /// Drains the stack, then the queue, until both are empty.
    ///
    /// Returns `Idle` on a clean drain or `HaltedOnError` when a dispatch
    /// failed with no error boundary open.
    pub async fn run(&mut self) -> ExecutorState {
        self.state = ExecutorState::Running;

        loop {
            let entry = match self.ctx.stack.pop() {
                Some(entry) => entry,
                None => match self.ctx.queue.pop_front() {
                    Some(line) => StackEntry::Command(line),
                    None => break,
                },
            };

            match entry {
                StackEntry::BoundaryStart { kind, id } => self.open_boundary(kind, id),
                StackEntry::BoundaryEnd { kind, id } => self.close_boundary(kind, id),
                StackEntry::Notice(text) => self.ctx.emit_info(text),
                StackEntry::Command(line) => {
                    if !self.step(&line).await {
                        self.halt();
                        return self.state;
                    }
                }
            }
        }

        // A START with no matching END must not leave output suppressed
        // for the next run; it only changed error visibility within this one.
        for (kind, id) in self.open_boundaries.drain(..) {
            warn!(?kind, id, "boundary left open at end of run");
            if kind == BoundaryKind::Silent {
                self.ctx.end_silent();
            }
        }

        self.state = ExecutorState::Idle;
        self.state
    }

    /// Executes one pending command line.
    ///
    /// Returns false when the failure must halt the run.
    async fn step(&mut self, line: &str) -> bool {
        debug!(line, "dispatching");
        match self.dispatch(line).await {
            Ok(()) => {
                self.ctx.vars.set_system(VAR_STATUS, "0");
                self.ctx.vars.set_system(VAR_ERROR, "");
                true
            }
            Err(err) => {
                self.ctx.vars.set_system(VAR_STATUS, "1");
                self.ctx.vars.set_system(VAR_ERROR, err.to_string());
                self.ctx.emit_error(err.to_string());

                // Parse errors are reported but never run-halting; dispatch
                // failures are absorbed only inside an error boundary.
                err.is_parse() || self.in_error_boundary()
            }
        }
    }

    /// Parses, interpolates, and dispatches one line.
    async fn dispatch(&mut self, line: &str) -> Result<()> {
        let desc = self.prepare(line)?;
        let handler = self
            .registry
            .get(&desc.name)
            .cloned()
            .ok_or_else(|| QuillError::unknown(desc.name.clone()))?;
        handler.execute(&mut self.ctx, &desc).await
    }

    /// Derives the interpolated descriptor for one line.
    ///
    /// An unprefixed line becomes the implicit send command with the whole
    /// line as its message.
    fn prepare(&self, line: &str) -> Result<Descriptor> {
        match parser::command_name(line) {
            Some(name) => {
                let mode = self
                    .registry
                    .parse_mode(name)
                    .unwrap_or(ParseMode::Raw);
                let mut desc = parser::parse_line(line, mode)?;
                for value in desc.options.values_mut() {
                    *value = interpolate(&self.ctx.vars, value);
                }
                desc.message = interpolate(&self.ctx.vars, &desc.message);
                Ok(desc)
            }
            None => Ok(Descriptor {
                name: IMPLICIT_COMMAND.to_string(),
                parse_mode: ParseMode::Raw,
                bracket_content: None,
                options: HashMap::new(),
                message: interpolate(&self.ctx.vars, line),
                raw_message: line.to_string(),
            }),
        }
    }

    fn open_boundary(&mut self, kind: BoundaryKind, id: u64) {
        debug!(?kind, id, "boundary opened");
        match kind {
            BoundaryKind::Error => {
                let status = self.ctx.vars.value(VAR_STATUS);
                let error = self.ctx.vars.value(VAR_ERROR);
                self.ctx.vars.set_system(VAR_LAST_STATUS, status);
                self.ctx.vars.set_system(VAR_LAST_ERROR, error);
            }
            BoundaryKind::Silent => self.ctx.begin_silent(),
        }
        self.open_boundaries.push((kind, id));
    }

    fn close_boundary(&mut self, kind: BoundaryKind, id: u64) {
        debug!(?kind, id, "boundary closed");
        match self
            .open_boundaries
            .iter()
            .rposition(|&(k, i)| k == kind && i == id)
        {
            Some(pos) => {
                self.open_boundaries.remove(pos);
                if kind == BoundaryKind::Silent {
                    self.ctx.end_silent();
                }
            }
            // An END whose START was never popped (e.g. discarded by a
            // reset) is inert.
            None => warn!(?kind, id, "boundary end without matching start"),
        }
    }

    fn in_error_boundary(&self) -> bool {
        self.open_boundaries
            .iter()
            .any(|&(kind, _)| kind == BoundaryKind::Error)
    }

    /// Stops the run: pending work is discarded and output visibility
    /// restored so the session itself stays usable.
    fn halt(&mut self) {
        self.ctx.stack.clear();
        self.ctx.queue.clear();
        for (kind, _) in self.open_boundaries.drain(..) {
            if kind == BoundaryKind::Silent {
                self.ctx.end_silent();
            }
        }
        self.state = ExecutorState::HaltedOnError;
    }
}
