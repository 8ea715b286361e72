//! Engine context passed to every command handler.
//!
//! Quill deliberately has no process-wide singletons: every component that a
//! handler may touch (variable store, stack, queue, chat session, LLM
//! client, output sink) travels in one explicit context object, so
//! concurrent test sessions stay isolated.

use std::sync::{Arc, Mutex};

use crate::engine::stack::{ConditionalQueue, ExecutionStack};
use crate::engine::vars::VariableStore;
use crate::llm::LlmClient;
use crate::session::ChatSession;

/// Transport-agnostic output event emitted during command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// Informational message (success, status, command output).
    Info(String),
    /// Error message. Never suppressed by silent boundaries.
    Error(String),
    /// Incremental chunk of a streaming reply.
    Chunk(String),
}

/// Sink consuming output events.
///
/// The console front end prints to the terminal; tests capture into memory.
pub trait OutputSink: Send {
    /// Consumes one event.
    fn emit(&mut self, event: OutputEvent);
}

/// Sink that writes to stdout/stderr.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, event: OutputEvent) {
        use std::io::Write;
        match event {
            OutputEvent::Info(msg) => println!("{msg}"),
            OutputEvent::Error(msg) => eprintln!("{msg}"),
            OutputEvent::Chunk(chunk) => {
                print!("{chunk}");
                let _ = std::io::stdout().flush();
            }
        }
    }
}

/// Sink that records events in memory for inspection.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    events: Arc<Mutex<Vec<OutputEvent>>>,
}

impl CaptureSink {
    /// Creates an empty capture sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle sharing this sink's event buffer.
    pub fn handle(&self) -> Self {
        self.clone()
    }

    /// Returns a snapshot of every recorded event.
    pub fn events(&self) -> Vec<OutputEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Concatenates recorded Info and Chunk text.
    pub fn text(&self) -> String {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                OutputEvent::Info(s) => Some(s + "\n"),
                OutputEvent::Chunk(s) => Some(s),
                OutputEvent::Error(_) => None,
            })
            .collect()
    }

    /// Returns recorded error messages.
    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                OutputEvent::Error(s) => Some(s),
                _ => None,
            })
            .collect()
    }
}

impl OutputSink for CaptureSink {
    fn emit(&mut self, event: OutputEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Shared state handed to every handler during dispatch.
pub struct EngineContext {
    /// Session-wide variable store.
    pub vars: VariableStore,
    /// Pending commands and boundary markers.
    pub stack: ExecutionStack,
    /// Commands staged by a true `if`.
    pub queue: ConditionalQueue,
    /// Chat history and positional projection owner.
    pub session: ChatSession,
    /// Backend used by the `send` command.
    pub llm: Arc<dyn LlmClient>,
    /// Set by `exit`; the front end stops reading input.
    pub exit_requested: bool,
    output: Box<dyn OutputSink>,
    silent_depth: usize,
}

impl EngineContext {
    /// Creates a context around the given backend and output sink.
    pub fn new(llm: Arc<dyn LlmClient>, output: Box<dyn OutputSink>) -> Self {
        let mut ctx = Self {
            vars: VariableStore::new(),
            stack: ExecutionStack::new(),
            queue: ConditionalQueue::new(),
            session: ChatSession::new(),
            llm,
            exit_requested: false,
            output,
            silent_depth: 0,
        };
        ctx.session.project_into(&mut ctx.vars);
        ctx
    }

    /// Emits an informational message unless a silent boundary is open.
    pub fn emit_info(&mut self, msg: impl Into<String>) {
        if self.silent_depth == 0 {
            self.output.emit(OutputEvent::Info(msg.into()));
        }
    }

    /// Emits a streaming chunk unless a silent boundary is open.
    pub fn emit_chunk(&mut self, chunk: impl Into<String>) {
        if self.silent_depth == 0 {
            self.output.emit(OutputEvent::Chunk(chunk.into()));
        }
    }

    /// Emits an error message. Errors stay visible inside silent regions.
    pub fn emit_error(&mut self, msg: impl Into<String>) {
        self.output.emit(OutputEvent::Error(msg.into()));
    }

    /// Opens one level of output suppression.
    pub fn begin_silent(&mut self) {
        self.silent_depth += 1;
    }

    /// Closes one level of output suppression.
    pub fn end_silent(&mut self) {
        self.silent_depth = self.silent_depth.saturating_sub(1);
    }

    /// Returns true while a silent boundary is open.
    pub fn is_silent(&self) -> bool {
        self.silent_depth > 0
    }

    /// Resets the session: history, variables, and pending work.
    pub fn reset_session(&mut self) {
        self.session.clear();
        self.vars.reset();
        self.stack.clear();
        self.queue.clear();
        self.session.project_into(&mut self.vars);
    }
}
