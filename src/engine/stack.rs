//! Execution stack and conditional queue.
//!
//! The stack holds pending command strings interleaved with boundary
//! markers. Markers are a tagged variant rather than sentinel strings, so
//! they can never collide with literal user text sharing the container.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// Kind of a boundary region on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Failures inside this region are absorbed instead of halting the run.
    Error,
    /// Non-error output inside this region is suppressed.
    Silent,
}

/// One entry on the execution stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEntry {
    /// An ordinary pending command line.
    Command(String),
    /// Literal text emitted when popped, bypassing parse and interpolation.
    ///
    /// Used for deferred progress messages that must not dispatch anything
    /// or touch `_output`.
    Notice(String),
    /// Opens a boundary region.
    BoundaryStart { kind: BoundaryKind, id: u64 },
    /// Closes the boundary region with the same id.
    BoundaryEnd { kind: BoundaryKind, id: u64 },
}

static NEXT_BOUNDARY_ID: AtomicU64 = AtomicU64::new(1);

/// Returns a process-unique boundary id.
///
/// Monotonic and collision-free even when a session reset fires mid-script.
pub fn next_boundary_id() -> u64 {
    NEXT_BOUNDARY_ID.fetch_add(1, Ordering::Relaxed)
}

/// LIFO container of pending commands and boundary markers.
///
/// The command meant to run first in a group must be pushed last.
#[derive(Debug, Clone, Default)]
pub struct ExecutionStack {
    entries: Vec<StackEntry>,
}

impl ExecutionStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes one entry.
    pub fn push(&mut self, entry: StackEntry) {
        self.entries.push(entry);
    }

    /// Pushes a pending command line.
    pub fn push_command(&mut self, line: impl Into<String>) {
        self.entries.push(StackEntry::Command(line.into()));
    }

    /// Pushes a deferred notice.
    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.entries.push(StackEntry::Notice(text.into()));
    }

    /// Wraps a command in a boundary region with a fresh id.
    ///
    /// Pushed END-command-START so that pop order is START, command, END.
    /// Returns the id of the new boundary.
    pub fn push_wrapped(&mut self, kind: BoundaryKind, command: impl Into<String>) -> u64 {
        let id = next_boundary_id();
        self.entries.push(StackEntry::BoundaryEnd { kind, id });
        self.entries.push(StackEntry::Command(command.into()));
        self.entries.push(StackEntry::BoundaryStart { kind, id });
        id
    }

    /// Pops the next pending entry.
    pub fn pop(&mut self) -> Option<StackEntry> {
        self.entries.pop()
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discards every pending entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// FIFO container staging commands whose condition evaluated true.
#[derive(Debug, Clone, Default)]
pub struct ConditionalQueue {
    entries: VecDeque<String>,
}

impl ConditionalQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a command for execution.
    pub fn push_back(&mut self, line: impl Into<String>) {
        self.entries.push_back(line.into());
    }

    /// Takes the next staged command.
    pub fn pop_front(&mut self) -> Option<String> {
        self.entries.pop_front()
    }

    /// Number of staged commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discards every staged command.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
