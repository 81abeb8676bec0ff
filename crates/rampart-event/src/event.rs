//! Interception event values.
//!
//! An [`Event`] is an immutable record of one interception callback,
//! correlated to its invocation and call tree by `invoke_id` and
//! `process_id`. Events are transient: the dispatch call that creates
//! one owns it, delivers it by reference, and drops it afterwards. They
//! carry no cross-call identity and are never persisted.

use crate::EventKind;
use rampart_types::{InvokeId, LoaderHandle, ProcessId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One interception event, tagged by kind.
///
/// Every variant carries the pair (`process_id`, `invoke_id`); the
/// payload is kind-specific. Intercepted values (arguments, return
/// value, thrown value) cross the instrumentation boundary as
/// [`serde_json::Value`].
///
/// # Example
///
/// ```
/// use rampart_event::{Event, EventKind};
/// use rampart_types::{InvokeId, ProcessId};
/// use serde_json::json;
///
/// let event = Event::Return {
///     process_id: ProcessId::new(1000),
///     invoke_id: InvokeId::new(1000),
///     value: json!("x"),
/// };
/// assert_eq!(event.kind(), EventKind::Return);
/// assert_eq!(event.invoke_id(), InvokeId::new(1000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Intercepted call entered.
    Before {
        /// Call-tree id.
        process_id: ProcessId,
        /// Invocation id.
        invoke_id: InvokeId,
        /// Loader servicing the declaring type, if resolvable.
        loader: Option<LoaderHandle>,
        /// Declaring type name of the intercepted method.
        class_name: String,
        /// Intercepted method name.
        method_name: String,
        /// Intercepted method descriptor/signature.
        method_desc: String,
        /// Receiver of the call (`Value::Null` for static calls).
        target: Value,
        /// Argument values.
        args: Vec<Value>,
    },

    /// Intercepted call completed normally.
    Return {
        /// Call-tree id.
        process_id: ProcessId,
        /// Invocation id.
        invoke_id: InvokeId,
        /// Returned value.
        value: Value,
    },

    /// Intercepted call completed by throwing.
    Throws {
        /// Call-tree id.
        process_id: ProcessId,
        /// Invocation id.
        invoke_id: InvokeId,
        /// Thrown value.
        thrown: Value,
    },

    /// Compensation: a listener forced an early return (legacy kind).
    ImmediatelyReturn {
        /// Call-tree id.
        process_id: ProcessId,
        /// Invocation id.
        invoke_id: InvokeId,
        /// The substitute return value the listener supplied.
        value: Value,
    },

    /// Compensation: a listener forced an early throw (legacy kind).
    ImmediatelyThrows {
        /// Call-tree id.
        process_id: ProcessId,
        /// Invocation id.
        invoke_id: InvokeId,
        /// The substitute thrown value the listener supplied.
        thrown: Value,
    },

    /// A call made by the intercepted method is about to start.
    CallBefore {
        /// Call-tree id.
        process_id: ProcessId,
        /// Invocation id of the *intercepted* method (peeked, not pushed).
        invoke_id: InvokeId,
        /// Call-site line number.
        line: u32,
        /// Callee owner type.
        owner: String,
        /// Callee method name.
        name: String,
        /// Callee method descriptor.
        desc: String,
    },

    /// A call made by the intercepted method returned.
    CallReturn {
        /// Call-tree id.
        process_id: ProcessId,
        /// Invocation id of the intercepted method.
        invoke_id: InvokeId,
    },

    /// A call made by the intercepted method threw.
    CallThrows {
        /// Call-tree id.
        process_id: ProcessId,
        /// Invocation id of the intercepted method.
        invoke_id: InvokeId,
        /// Exception type name reported by the instrumentation.
        exception: String,
    },

    /// A source line of the intercepted method was reached.
    Line {
        /// Call-tree id.
        process_id: ProcessId,
        /// Invocation id of the intercepted method.
        invoke_id: InvokeId,
        /// Line number.
        line: u32,
    },
}

impl Event {
    /// Returns the kind tag of this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Before { .. } => EventKind::Before,
            Self::Return { .. } => EventKind::Return,
            Self::Throws { .. } => EventKind::Throws,
            Self::ImmediatelyReturn { .. } => EventKind::ImmediatelyReturn,
            Self::ImmediatelyThrows { .. } => EventKind::ImmediatelyThrows,
            Self::CallBefore { .. } => EventKind::CallBefore,
            Self::CallReturn { .. } => EventKind::CallReturn,
            Self::CallThrows { .. } => EventKind::CallThrows,
            Self::Line { .. } => EventKind::Line,
        }
    }

    /// Returns the call-tree id this event belongs to.
    #[must_use]
    pub fn process_id(&self) -> ProcessId {
        match self {
            Self::Before { process_id, .. }
            | Self::Return { process_id, .. }
            | Self::Throws { process_id, .. }
            | Self::ImmediatelyReturn { process_id, .. }
            | Self::ImmediatelyThrows { process_id, .. }
            | Self::CallBefore { process_id, .. }
            | Self::CallReturn { process_id, .. }
            | Self::CallThrows { process_id, .. }
            | Self::Line { process_id, .. } => *process_id,
        }
    }

    /// Returns the invocation id this event is correlated to.
    #[must_use]
    pub fn invoke_id(&self) -> InvokeId {
        match self {
            Self::Before { invoke_id, .. }
            | Self::Return { invoke_id, .. }
            | Self::Throws { invoke_id, .. }
            | Self::ImmediatelyReturn { invoke_id, .. }
            | Self::ImmediatelyThrows { invoke_id, .. }
            | Self::CallBefore { invoke_id, .. }
            | Self::CallReturn { invoke_id, .. }
            | Self::CallThrows { invoke_id, .. }
            | Self::Line { invoke_id, .. } => *invoke_id,
        }
    }
}
