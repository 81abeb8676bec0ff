//! Listener SDK errors.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`EventError::ListenerFailure`] | `EVENT_LISTENER_FAILURE` | No |
//!
//! A listener failure is an *unrelated* fault inside `on_event` — a bug
//! or resource problem in the plugin, never a control-transfer request
//! (those are [`EventResponse::Control`](crate::EventResponse)). The
//! engine swallows it after logging unless the listener is flagged
//! interrupting.

use rampart_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Listener-side error.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum EventError {
    /// The listener's `on_event` failed for a reason unrelated to
    /// control transfer.
    ///
    /// For a non-interrupting listener this is logged and swallowed;
    /// the protected program never observes it. For an interrupting
    /// listener the engine re-raises it to the intercepted call site.
    ///
    /// # Example
    ///
    /// ```
    /// use rampart_event::EventError;
    /// use rampart_types::ErrorCode;
    ///
    /// let err = EventError::ListenerFailure("rule store unreachable".into());
    /// assert_eq!(err.code(), "EVENT_LISTENER_FAILURE");
    /// assert!(!err.is_recoverable());
    /// ```
    #[error("listener failure: {0}")]
    ListenerFailure(String),
}

impl ErrorCode for EventError {
    fn code(&self) -> &'static str {
        match self {
            Self::ListenerFailure(_) => "EVENT_LISTENER_FAILURE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::ListenerFailure(_) => false,
        }
    }
}
