//! Flow action returned to the instrumentation call site.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the instrumentation should do with the intercepted call after a
/// callback has been processed.
///
/// | Variant | Call site behavior |
/// |---------|--------------------|
/// | `None` | proceed unchanged |
/// | `Return` | return the given value instead of executing/continuing |
/// | `Throw` | throw the given value instead of executing/continuing |
///
/// This is the engine's half of the callback contract; the listener's
/// half is [`ProcessControl`](rampart_event::ProcessControl), which the
/// engine resolves into one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlowAction {
    /// No flow change.
    None,
    /// Force the intercepted call to return this value.
    Return(Value),
    /// Force the intercepted call to throw this value.
    Throw(Value),
}

impl FlowAction {
    /// Returns `true` if this is `None`.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` if this is `Return`.
    #[must_use]
    pub fn is_return(&self) -> bool {
        matches!(self, Self::Return(_))
    }

    /// Returns `true` if this is `Throw`.
    #[must_use]
    pub fn is_throw(&self) -> bool {
        matches!(self, Self::Throw(_))
    }
}
