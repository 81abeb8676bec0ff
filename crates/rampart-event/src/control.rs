//! Control-transfer signal types.
//!
//! A listener answers every event with an [`EventResponse`]. Returning
//! [`EventResponse::Continue`] leaves the intercepted call untouched;
//! returning [`EventResponse::Control`] raises a deliberate
//! control-transfer request — not an error — asking the engine to force
//! an early return or an early throw from the intercepted call, or to
//! explicitly do neither.
//!
//! # Why a sum type and not an error path
//!
//! The signal must be fully handled at the dispatch boundary and never
//! propagate further. Keeping it out of the error channel makes that a
//! type-level guarantee instead of a catch-site convention. Listener
//! *failures* use `Err` and are a different thing entirely.
//!
//! # Example
//!
//! ```
//! use rampart_event::{EventResponse, ProcessControl};
//! use serde_json::json;
//!
//! // Veto the call: make it return 42 instead of running.
//! let response = EventResponse::Control(ProcessControl::return_immediately(json!(42)));
//! assert!(response.is_control());
//!
//! // Suppress all further events for this call tree as well.
//! let control = ProcessControl::throws_immediately(json!({"type": "SecurityException"}))
//!     .ignore_process_events();
//! assert!(control.ignore_process_events);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The requested transfer, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlState {
    /// No transfer; proceed normally.
    None,
    /// Force the intercepted call to return the given substitute value.
    Return(Value),
    /// Force the intercepted call to throw the given substitute value.
    Throws(Value),
}

/// A control-transfer request raised by a listener.
///
/// `Default` is intentionally NOT implemented: a defaulted request with
/// a silently wrong `ignore_process_events` flag would suppress event
/// delivery for the rest of a call tree. Construct explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessControl {
    /// What transfer is requested.
    pub state: ControlState,
    /// If set, suppress delivery of all further events for the
    /// remaining lifetime of this call tree.
    pub ignore_process_events: bool,
}

impl ProcessControl {
    /// No transfer, proceed normally (`NONE_IMMEDIATELY`).
    #[must_use]
    pub fn none_immediately() -> Self {
        Self {
            state: ControlState::None,
            ignore_process_events: false,
        }
    }

    /// Force an early return with the given value (`RETURN_IMMEDIATELY`).
    #[must_use]
    pub fn return_immediately(value: Value) -> Self {
        Self {
            state: ControlState::Return(value),
            ignore_process_events: false,
        }
    }

    /// Force an early throw with the given value (`THROWS_IMMEDIATELY`).
    #[must_use]
    pub fn throws_immediately(thrown: Value) -> Self {
        Self {
            state: ControlState::Throws(thrown),
            ignore_process_events: false,
        }
    }

    /// Additionally suppress all further events for this call tree.
    #[must_use]
    pub fn ignore_process_events(mut self) -> Self {
        self.ignore_process_events = true;
        self
    }

    /// Returns `true` if no transfer is requested.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self.state, ControlState::None)
    }

    /// Returns `true` for a forced-return request.
    #[must_use]
    pub fn is_return(&self) -> bool {
        matches!(self.state, ControlState::Return(_))
    }

    /// Returns `true` for a forced-throw request.
    #[must_use]
    pub fn is_throws(&self) -> bool {
        matches!(self.state, ControlState::Throws(_))
    }
}

/// Outcome of one `on_event` delivery.
///
/// | Variant | Meaning |
/// |---------|---------|
/// | `Continue` | normal completion, nothing to do |
/// | `Control` | the listener raised a control-transfer request |
///
/// Unrelated listener failures travel as `Err(EventError)` instead and
/// are swallowed or re-raised depending on the listener's interrupting
/// capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventResponse {
    /// Normal completion; no control transfer.
    Continue,
    /// A control-transfer request.
    Control(ProcessControl),
}

impl EventResponse {
    /// Returns `true` if this is `Continue`.
    #[must_use]
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Returns `true` if this is `Control`.
    #[must_use]
    pub fn is_control(&self) -> bool {
        matches!(self, Self::Control(_))
    }
}
