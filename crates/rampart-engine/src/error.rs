//! Engine errors.
//!
//! The engine's error policy is "drop and continue": structural desyncs
//! are dropped (at most a diagnostic warning), non-interrupting listener
//! failures are logged and swallowed, compensation failures are always
//! swallowed. The single error that surfaces to the instrumentation
//! call site is an *interrupting* listener failing, which by contract
//! fails the intercepted call itself.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`EngineError::ListenerInterrupted`] | `ENGINE_LISTENER_INTERRUPTED` | No |

use rampart_types::{ErrorCode, ListenerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Interception engine error.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum EngineError {
    /// An interrupting listener failed while handling an event.
    ///
    /// Re-raised to the caller of the intercepted method: the call
    /// fails. This is the only engine-internal fault that ever reaches
    /// the protected program.
    ///
    /// # Example
    ///
    /// ```
    /// use rampart_engine::EngineError;
    /// use rampart_types::{ErrorCode, ListenerId};
    ///
    /// let err = EngineError::ListenerInterrupted {
    ///     listener_id: ListenerId::new(7),
    ///     message: "rule store unreachable".into(),
    /// };
    /// assert_eq!(err.code(), "ENGINE_LISTENER_INTERRUPTED");
    /// assert!(!err.is_recoverable());
    /// ```
    #[error("interrupting listener {listener_id} failed: {message}")]
    ListenerInterrupted {
        /// The failing listener.
        listener_id: ListenerId,
        /// The listener's failure message.
        message: String,
    },
}

impl ErrorCode for EngineError {
    fn code(&self) -> &'static str {
        match self {
            Self::ListenerInterrupted { .. } => "ENGINE_LISTENER_INTERRUPTED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::ListenerInterrupted { .. } => false,
        }
    }
}
