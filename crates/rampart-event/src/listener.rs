//! EventListener trait and testing utilities.

use crate::{Event, EventError, EventResponse};

/// A plugin-supplied observer of interception events.
///
/// Listeners are registered with the engine under an externally assigned
/// [`ListenerId`](rampart_types::ListenerId) together with the set of
/// [`EventKind`](crate::EventKind)s they subscribe to; `on_event` is
/// only ever invoked for subscribed kinds.
///
/// # Outcomes
///
/// - `Ok(EventResponse::Continue)` — observe only, no flow change
/// - `Ok(EventResponse::Control(..))` — request an early return/throw
/// - `Err(EventError)` — an internal listener fault; swallowed after
///   logging unless [`interrupting`](Self::interrupting) is `true`
///
/// # Thread Safety
///
/// Listeners must be `Send + Sync`: callbacks execute synchronously on
/// whichever program thread hit the instrumented call site, and many
/// threads may do so at once. A slow `on_event` stalls the intercepted
/// call itself.
pub trait EventListener: Send + Sync {
    /// Handles one event.
    fn on_event(&self, event: &Event) -> Result<EventResponse, EventError>;

    /// Whether a failure in this listener should interrupt the
    /// intercepted call instead of being swallowed. Default: `false`.
    fn interrupting(&self) -> bool {
        false
    }
}

/// Test utilities for the listener SDK.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;
    use crate::ProcessControl;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A mock listener for testing.
    ///
    /// Returns a fixed response on every `on_event` call, records the
    /// events it receives, and tracks the invocation count. Wrap it in
    /// an `Arc` and keep a clone to inspect it after handing it to the
    /// engine.
    pub struct MockListener {
        /// Response produced on every on_event() call.
        response_fn: Box<dyn Fn(&Event) -> Result<EventResponse, EventError> + Send + Sync>,
        /// Interrupting capability flag.
        interrupting: bool,
        /// Number of times on_event() has been called.
        call_count: AtomicUsize,
        /// Every event received, in order.
        received: Mutex<Vec<Event>>,
    }

    impl MockListener {
        /// Creates a pure observer that always returns `Continue`.
        #[must_use]
        pub fn observer() -> Self {
            Self::responder(|_| Ok(EventResponse::Continue))
        }

        /// Creates a listener that forces an early return with `value`.
        #[must_use]
        pub fn returner(value: serde_json::Value) -> Self {
            Self::responder(move |_| {
                Ok(EventResponse::Control(ProcessControl::return_immediately(
                    value.clone(),
                )))
            })
        }

        /// Creates a listener that forces an early throw with `thrown`.
        #[must_use]
        pub fn thrower(thrown: serde_json::Value) -> Self {
            Self::responder(move |_| {
                Ok(EventResponse::Control(ProcessControl::throws_immediately(
                    thrown.clone(),
                )))
            })
        }

        /// Creates a listener whose `on_event` always fails.
        #[must_use]
        pub fn failer(message: &str) -> Self {
            let message = message.to_string();
            Self::responder(move |_| Err(EventError::ListenerFailure(message.clone())))
        }

        /// Creates a listener driven by an arbitrary response function.
        #[must_use]
        pub fn responder(
            f: impl Fn(&Event) -> Result<EventResponse, EventError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                response_fn: Box::new(f),
                interrupting: false,
                call_count: AtomicUsize::new(0),
                received: Mutex::new(Vec::new()),
            }
        }

        /// Marks the listener as interrupting.
        #[must_use]
        pub fn with_interrupting(mut self) -> Self {
            self.interrupting = true;
            self
        }

        /// Returns the number of times `on_event` has been called.
        pub fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Returns a snapshot of every event received so far.
        pub fn events(&self) -> Vec<Event> {
            self.received.lock().clone()
        }

        /// Returns a snapshot of the received event kinds, in order.
        pub fn kinds(&self) -> Vec<crate::EventKind> {
            self.received.lock().iter().map(Event::kind).collect()
        }
    }

    impl EventListener for MockListener {
        fn on_event(&self, event: &Event) -> Result<EventResponse, EventError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.received.lock().push(event.clone());
            (self.response_fn)(event)
        }

        fn interrupting(&self) -> bool {
            self.interrupting
        }
    }
}
