//! Per-thread, per-listener call process.
//!
//! Interception callbacks arrive as a flat stream; a [`CallProcess`]
//! folds them back into the call-stack shape the intercepted program
//! actually has. One instance exists per (listener, thread) and lives
//! exactly as long as the current top-level call tree: created on the
//! first push, destroyed when the stack returns to empty or during bulk
//! cleanup of a frozen processor.
//!
//! # Invariants
//!
//! - The stack is empty exactly when no intercepted call is executing
//!   on this thread for this listener.
//! - While non-empty, the process id equals the bottom-of-stack
//!   invocation id.

use rampart_event::EventFactory;
use rampart_types::{InvokeId, ProcessId};

/// Call history of one listener on one thread.
#[derive(Debug, Default)]
pub struct CallProcess {
    /// Active invocation ids, innermost last.
    stack: Vec<InvokeId>,
    /// Suppress all further event delivery for this call tree.
    ignore_process: bool,
    /// A forced throw is propagating and must be recognized (not
    /// re-dispatched) by the next end-of-call-throws callback.
    exception_from_immediately: bool,
    /// Factory for this process's events.
    factory: EventFactory,
}

impl CallProcess {
    /// Creates an empty call process.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the invocation id of a call that just began.
    pub fn push_invoke_id(&mut self, invoke_id: InvokeId) {
        self.stack.push(invoke_id);
    }

    /// Pops the invocation id of the call that just ended.
    ///
    /// `None` on an empty stack signals a begin/end miscorrelation the
    /// caller is expected to drop.
    pub fn pop_invoke_id(&mut self) -> Option<InvokeId> {
        self.stack.pop()
    }

    /// Peeks the currently active invocation id without popping.
    #[must_use]
    pub fn get_invoke_id(&self) -> Option<InvokeId> {
        self.stack.last().copied()
    }

    /// Returns the process id: the bottom-of-stack invocation id.
    /// Only meaningful while the stack is non-empty.
    #[must_use]
    pub fn get_process_id(&self) -> Option<ProcessId> {
        self.stack.first().copied().map(ProcessId::from)
    }

    /// Returns `true` if no call is currently active.
    #[must_use]
    pub fn is_empty_stack(&self) -> bool {
        self.stack.is_empty()
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Suppresses delivery of all further events for this call tree.
    pub fn mark_ignore_process(&mut self) {
        self.ignore_process = true;
    }

    /// Returns `true` if further event delivery is suppressed.
    #[must_use]
    pub fn is_ignore_process(&self) -> bool {
        self.ignore_process
    }

    /// Marks that a forced throw is about to propagate out of the
    /// intercepted call.
    pub fn mark_exception_from_immediately(&mut self) {
        self.exception_from_immediately = true;
    }

    /// Test-and-clear read of the forced-throw mark.
    ///
    /// The mark is consumed exactly once, by the end-of-call-throws
    /// callback of the frame the forced throw was raised in.
    pub fn rolling_is_exception_from_immediately(&mut self) -> bool {
        std::mem::take(&mut self.exception_from_immediately)
    }

    /// The factory this process builds its events with.
    #[must_use]
    pub fn event_factory(&self) -> &EventFactory {
        &self.factory
    }
}
