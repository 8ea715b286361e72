//! The command execution core.
//!
//! Everything between a raw input line and a completed command lives here:
//! the line parser, the variable store and interpolation engine, the command
//! registry, and the stack/queue-driven executor.

pub mod context;
pub mod descriptor;
pub mod executor;
pub mod interpolate;
pub mod parser;
pub mod registry;
pub mod stack;
pub mod vars;

pub use context::{CaptureSink, EngineContext, OutputEvent, OutputSink, StdoutSink};
pub use descriptor::{Descriptor, ParseMode, COMMAND_PREFIX};
pub use executor::{Engine, ExecutorState, IMPLICIT_COMMAND};
pub use interpolate::interpolate;
pub use registry::{CommandCategory, CommandHandler, CommandHelp, CommandRegistry};
pub use stack::{BoundaryKind, ConditionalQueue, ExecutionStack, StackEntry};
pub use vars::{Namespace, VariableStore};
