//! Callback handling and listener dispatch.
//!
//! [`EventHandler`] is the seam between the instrumentation layer and
//! registered listeners. The instrumentation reports raw callbacks
//! (call entered, call returned, call threw, nested-call and line
//! annotations); the handler correlates them into per-thread call
//! stacks, builds the corresponding [`Event`]s, dispatches them to the
//! addressed listener, and translates the listener's answer into the
//! [`FlowAction`] the call site must apply.
//!
//! ```text
//!  instrumentation ── on_before / on_return / on_throws / on_call_* ──┐
//!                                                                     ▼
//!                 ┌──────────────┐   lookup    ┌────────────────────────┐
//!                 │ EventHandler │───────────▶│ ProcessorRegistry       │
//!                 └──────┬───────┘             │  listener_id→processor │
//!                        │ per-thread stack    └────────────────────────┘
//!                        ▼
//!                 ┌──────────────┐  on_event   ┌──────────────┐
//!                 │ CallProcess  │────────────▶│ EventListener │
//!                 └──────────────┘             └──────────────┘
//! ```
//!
//! Every entry point short-circuits to a no-op when a protected region
//! is open, when the listener id is unregistered, or when the processor
//! is frozen. Begin/end miscorrelations (a constructor chaining into
//! `super.<init>` fires end-style callbacks with no matching begin) are
//! dropped silently.

use crate::{
    CallProcess, EngineError, EventProcessor, FlowAction, InvokeIdSequencer, LoaderContext,
    NoopLoaderContext, ProcessorRegistry, Protector,
};
use rampart_event::{
    ControlState, Event, EventFactory, EventKind, EventListener, EventResponse, ProcessControl,
};
use rampart_types::{InvokeId, ListenerId, ObjectId, ProcessId};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Outcome of an intercepted call, as reported by the instrumentation.
enum EndOutcome {
    Return(Value),
    Throws(Value),
}

/// What an end-of-call callback resolved to before dispatch.
enum EndDisposition {
    /// Unmatched callback, drop silently.
    Drop,
    /// A forced throw completing its propagation; re-throw untouched.
    PassThrough(Value),
    /// Event delivery suppressed for this call tree.
    Ignored,
    /// Dispatch this event.
    Dispatch(Event),
}

/// The interception engine's dispatch core.
///
/// One handler serves the whole process: it owns the processor
/// registry, allocates invocation ids, and runs every callback. All
/// methods take `&self`; callbacks execute concurrently on whichever
/// program threads hit instrumented call sites.
pub struct EventHandler {
    registry: ProcessorRegistry,
    sequencer: InvokeIdSequencer,
    protector: Protector,
    loader_context: Arc<dyn LoaderContext>,
}

impl EventHandler {
    /// Creates a handler with no loader-routing collaborator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_loader_context(Arc::new(NoopLoaderContext))
    }

    /// Creates a handler wired to an external loader context.
    #[must_use]
    pub fn with_loader_context(loader_context: Arc<dyn LoaderContext>) -> Self {
        Self {
            registry: ProcessorRegistry::new(),
            sequencer: InvokeIdSequencer::new(),
            protector: Protector::new(),
            loader_context,
        }
    }

    /// The protected-region flag shared with the management layer.
    ///
    /// Engine-internal work that may itself execute instrumented code
    /// runs under [`Protector::enter`]; callbacks raised inside the
    /// region are muted.
    #[must_use]
    pub fn protector(&self) -> &Protector {
        &self.protector
    }

    /// The processor registry.
    #[must_use]
    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    // ── Listener lifecycle ───────────────────────────────────

    /// Registers (or replaces) `listener` under `listener_id`,
    /// subscribed to `event_kinds`.
    pub fn activate(
        &self,
        listener_id: ListenerId,
        listener: Arc<dyn EventListener>,
        event_kinds: impl IntoIterator<Item = EventKind>,
    ) {
        self.registry.activate(listener_id, listener, event_kinds);
    }

    /// Freezes the listener registered under `listener_id`.
    pub fn freeze(&self, listener_id: ListenerId) {
        self.registry.freeze(listener_id);
    }

    /// Removes the listener registered under `listener_id`.
    pub fn remove(&self, listener_id: ListenerId) {
        self.registry.remove(listener_id);
    }

    /// Tears down every registration. See [`ProcessorRegistry::clean`].
    pub fn clean(&self) {
        self.registry.clean();
    }

    // ── Instrumentation callbacks ────────────────────────────

    /// An intercepted call addressed to `listener_id` just entered.
    ///
    /// Allocates an invocation id, pushes it on the calling thread's
    /// stack, resolves and binds the business loader, and dispatches a
    /// begin-of-call event. The returned [`FlowAction`] tells the call
    /// site whether to run the call or to veto it with a forced
    /// return/throw; a forced action here means no end-of-call callback
    /// will arrive for this invocation.
    #[allow(clippy::too_many_arguments)]
    pub fn on_before(
        &self,
        listener_id: ListenerId,
        loader_object_id: Option<ObjectId>,
        class_name: &str,
        method_name: &str,
        method_desc: &str,
        target: Value,
        args: Vec<Value>,
    ) -> Result<FlowAction, EngineError> {
        let Some(processor) = self.dispatchable(listener_id) else {
            return Ok(FlowAction::None);
        };

        let prepared = processor.with_process(|process| {
            if process.is_ignore_process() {
                return None;
            }
            let invoke_id = self.sequencer.next();
            process.push_invoke_id(invoke_id);
            // Bottom of stack; for a top-level call that is the id just
            // pushed.
            let process_id = process
                .get_process_id()
                .unwrap_or_else(|| ProcessId::from(invoke_id));
            let loader = loader_object_id.and_then(|id| self.loader_context.lookup(id));
            let event = process.event_factory().make_before_event(
                process_id,
                invoke_id,
                loader.clone(),
                class_name,
                method_name,
                method_desc,
                target,
                args,
            );
            Some((loader, event))
        });
        let Some((loader, event)) = prepared else {
            return Ok(FlowAction::None);
        };

        if let Some(loader) = loader {
            self.loader_context.bind_current(loader);
        }
        self.handle_event(&processor, &event)
    }

    /// The intercepted call addressed to `listener_id` completed
    /// normally with `value`.
    pub fn on_return(
        &self,
        listener_id: ListenerId,
        value: Value,
    ) -> Result<FlowAction, EngineError> {
        let result = self.handle_on_end(listener_id, EndOutcome::Return(value));
        self.loader_context.clear_current();
        result
    }

    /// The intercepted call addressed to `listener_id` completed by
    /// throwing `thrown`.
    pub fn on_throws(
        &self,
        listener_id: ListenerId,
        thrown: Value,
    ) -> Result<FlowAction, EngineError> {
        let result = self.handle_on_end(listener_id, EndOutcome::Throws(thrown));
        self.loader_context.clear_current();
        result
    }

    /// A call made by the intercepted method is about to start.
    ///
    /// Annotates the currently active invocation; never pushes or pops.
    pub fn on_call_before(
        &self,
        listener_id: ListenerId,
        line: u32,
        owner: &str,
        name: &str,
        desc: &str,
    ) -> Result<(), EngineError> {
        self.handle_annotation(listener_id, |factory, process_id, invoke_id| {
            factory.make_call_before_event(process_id, invoke_id, line, owner, name, desc)
        })
    }

    /// A call made by the intercepted method returned.
    pub fn on_call_return(&self, listener_id: ListenerId) -> Result<(), EngineError> {
        self.handle_annotation(listener_id, |factory, process_id, invoke_id| {
            factory.make_call_return_event(process_id, invoke_id)
        })
    }

    /// A call made by the intercepted method threw `exception`.
    pub fn on_call_throws(
        &self,
        listener_id: ListenerId,
        exception: &str,
    ) -> Result<(), EngineError> {
        self.handle_annotation(listener_id, |factory, process_id, invoke_id| {
            factory.make_call_throws_event(process_id, invoke_id, exception)
        })
    }

    /// A source line of the intercepted method was reached.
    pub fn on_line(&self, listener_id: ListenerId, line: u32) -> Result<(), EngineError> {
        self.handle_annotation(listener_id, |factory, process_id, invoke_id| {
            factory.make_line_event(process_id, invoke_id, line)
        })
    }

    // ── Internals ────────────────────────────────────────────

    /// Resolves `listener_id` to a processor that events may currently
    /// be dispatched to.
    fn dispatchable(&self, listener_id: ListenerId) -> Option<Arc<EventProcessor>> {
        if self.protector.is_protecting() {
            return None;
        }
        let processor = self.registry.get(listener_id)?;
        if processor.is_frozen() {
            return None;
        }
        Some(processor)
    }

    /// Shared end-of-call path for both outcomes.
    fn handle_on_end(
        &self,
        listener_id: ListenerId,
        outcome: EndOutcome,
    ) -> Result<FlowAction, EngineError> {
        let Some(processor) = self.dispatchable(listener_id) else {
            return Ok(FlowAction::None);
        };

        let disposition = processor
            .try_with_process(|process| {
                // Begin/end miscorrelation (super.<init> chaining): the
                // end of a call whose begin was never observed.
                if process.is_empty_stack() {
                    return EndDisposition::Drop;
                }
                // Bottom of stack, read while this frame still counts.
                let (Some(process_id), Some(invoke_id)) =
                    (process.get_process_id(), process.pop_invoke_id())
                else {
                    return EndDisposition::Drop;
                };

                // A throw forced by a listener completes here; it was
                // already dispatched (as a compensation event) when it
                // was raised.
                if let EndOutcome::Throws(ref thrown) = outcome {
                    if process.rolling_is_exception_from_immediately() {
                        return EndDisposition::PassThrough(thrown.clone());
                    }
                }

                if process.is_ignore_process() {
                    return EndDisposition::Ignored;
                }

                if check_process_stack(process_id, invoke_id, process.is_empty_stack()) {
                    warn!(
                        %process_id,
                        %invoke_id,
                        %listener_id,
                        "process stack desync"
                    );
                }

                let event = match outcome {
                    EndOutcome::Return(value) => {
                        process
                            .event_factory()
                            .make_return_event(process_id, invoke_id, value)
                    }
                    EndOutcome::Throws(thrown) => {
                        process
                            .event_factory()
                            .make_throws_event(process_id, invoke_id, thrown)
                    }
                };
                EndDisposition::Dispatch(event)
            })
            .unwrap_or(EndDisposition::Drop);

        let result = match disposition {
            EndDisposition::Drop | EndDisposition::Ignored => Ok(FlowAction::None),
            EndDisposition::PassThrough(thrown) => Ok(FlowAction::Throw(thrown)),
            EndDisposition::Dispatch(event) => self.handle_event(&processor, &event),
        };

        // The call tree completed; release the thread's slot.
        if processor
            .try_with_process(|process| process.is_empty_stack())
            .unwrap_or(false)
        {
            processor.remove_thread_process();
        }
        result
    }

    /// Shared path for the peek-only annotation callbacks.
    fn handle_annotation(
        &self,
        listener_id: ListenerId,
        build: impl FnOnce(&EventFactory, ProcessId, InvokeId) -> Event,
    ) -> Result<(), EngineError> {
        let Some(processor) = self.dispatchable(listener_id) else {
            return Ok(());
        };

        let event = processor
            .try_with_process(|process| {
                // Uncorrelatable without an active invocation.
                if process.is_empty_stack() || process.is_ignore_process() {
                    return None;
                }
                let process_id = process.get_process_id()?;
                let invoke_id = process.get_invoke_id()?;
                Some(build(process.event_factory(), process_id, invoke_id))
            })
            .flatten();

        match event {
            // Annotation callbacks cannot change flow at their call
            // site; the resolved action is discarded.
            Some(event) => self.handle_event(&processor, &event).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Dispatches `event` to the processor's listener and interprets
    /// the answer.
    fn handle_event(
        &self,
        processor: &EventProcessor,
        event: &Event,
    ) -> Result<FlowAction, EngineError> {
        if !processor.subscribes(event.kind()) {
            return Ok(FlowAction::None);
        }

        match processor.listener().on_event(event) {
            Ok(EventResponse::Continue) => Ok(FlowAction::None),
            Ok(EventResponse::Control(control)) => {
                Ok(self.resolve_control(processor, event, control))
            }
            Err(fault) => {
                if processor.interrupting() {
                    return Err(EngineError::ListenerInterrupted {
                        listener_id: processor.listener_id(),
                        message: fault.to_string(),
                    });
                }
                warn!(
                    listener_id = %processor.listener_id(),
                    kind = event.kind().name(),
                    error = %fault,
                    "listener failed; event dropped"
                );
                Ok(FlowAction::None)
            }
        }
    }

    /// Interprets a control-transfer request raised by a listener.
    fn resolve_control(
        &self,
        processor: &EventProcessor,
        event: &Event,
        control: ProcessControl,
    ) -> FlowAction {
        let ignore = control.ignore_process_events;
        if ignore {
            processor.with_process(CallProcess::mark_ignore_process);
        }

        let action = match control.state {
            ControlState::None => FlowAction::None,

            ControlState::Return(value) => {
                if !ignore {
                    self.compensate(processor, event, EventKind::ImmediatelyReturn, &value);
                }
                // A veto at begin-of-call means the matching end
                // callback never arrives; realign the stack here.
                if event.kind().is_begin_of_call() {
                    processor.try_with_process(|process| {
                        process.pop_invoke_id();
                    });
                }
                FlowAction::Return(value)
            }

            ControlState::Throws(thrown) => {
                if !ignore {
                    if event.kind().is_begin_of_call() {
                        processor.try_with_process(|process| {
                            process.pop_invoke_id();
                        });
                    }
                    // The forced throw will surface once more as an
                    // end-of-call-throws callback while it propagates;
                    // mark it so that callback passes it through
                    // instead of re-dispatching. A throws-triggered
                    // throw needs no mark: the propagation it joins is
                    // already being observed normally.
                    if event.kind() != EventKind::Throws {
                        processor.with_process(CallProcess::mark_exception_from_immediately);
                    }
                    self.compensate(processor, event, EventKind::ImmediatelyThrows, &thrown);
                }
                FlowAction::Throw(thrown)
            }
        };

        if processor
            .try_with_process(|process| process.is_empty_stack())
            .unwrap_or(false)
        {
            processor.remove_thread_process();
        }
        action
    }

    /// Synthesizes the legacy compensation event for a control
    /// transfer, for listeners that still subscribe to it.
    ///
    /// Compensation failures never propagate.
    fn compensate(
        &self,
        processor: &EventProcessor,
        origin: &Event,
        kind: EventKind,
        value: &Value,
    ) {
        if !processor.subscribes(kind) {
            return;
        }

        let process_id = origin.process_id();
        let invoke_id = origin.invoke_id();
        let event = processor.with_process(|process| match kind {
            EventKind::ImmediatelyThrows => process
                .event_factory()
                .make_immediately_throws_event(process_id, invoke_id, value.clone()),
            _ => process
                .event_factory()
                .make_immediately_return_event(process_id, invoke_id, value.clone()),
        });

        if let Err(cause) = processor.listener().on_event(&event) {
            warn!(
                kind = event.kind().name(),
                %process_id,
                %invoke_id,
                listener_id = %processor.listener_id(),
                origin = origin.kind().name(),
                error = %cause,
                "compensation event failed"
            );
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandler")
            .field("registry", &self.registry)
            .field("protecting", &self.protector.is_protecting())
            .finish_non_exhaustive()
    }
}

/// Returns `true` on a structural desync: reaching the bottom of the
/// stack must coincide with the stack becoming empty.
fn check_process_stack(process_id: ProcessId, invoke_id: InvokeId, is_empty_stack: bool) -> bool {
    (process_id.matches(invoke_id) && !is_empty_stack)
        || (!process_id.matches(invoke_id) && is_empty_stack)
}
