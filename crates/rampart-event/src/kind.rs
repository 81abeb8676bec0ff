//! Event kinds for subscription-based dispatch.
//!
//! A listener declares the kinds it wants at activation time and is
//! never invoked for any other kind.
//!
//! # Kinds
//!
//! | Kind | Fired | Stack effect |
//! |------|-------|--------------|
//! | `Before` | intercepted call entered | push |
//! | `Return` | intercepted call returned | pop |
//! | `Throws` | intercepted call threw | pop |
//! | `ImmediatelyReturn` | compensation for a forced return | none |
//! | `ImmediatelyThrows` | compensation for a forced throw | none |
//! | `CallBefore` | nested call about to start | peek |
//! | `CallReturn` | nested call returned | peek |
//! | `CallThrows` | nested call threw | peek |
//! | `Line` | source line reached | peek |
//!
//! `ImmediatelyReturn`/`ImmediatelyThrows` are legacy kinds: they predate
//! the [`ProcessControl`](crate::ProcessControl) signal and are only
//! synthesized as compensation events for listeners that still subscribe
//! to them.

use serde::{Deserialize, Serialize};

/// Kind of an interception event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Intercepted call entered.
    Before,
    /// Intercepted call completed normally.
    Return,
    /// Intercepted call completed by throwing.
    Throws,
    /// Compensation for a listener-forced early return (legacy).
    ImmediatelyReturn,
    /// Compensation for a listener-forced early throw (legacy).
    ImmediatelyThrows,
    /// A call made *by* the intercepted method is about to start.
    CallBefore,
    /// A call made by the intercepted method returned.
    CallReturn,
    /// A call made by the intercepted method threw.
    CallThrows,
    /// A source line of the intercepted method was reached.
    Line,
}

impl EventKind {
    /// Returns `true` for the begin-of-call kind.
    #[must_use]
    pub fn is_begin_of_call(self) -> bool {
        matches!(self, Self::Before)
    }

    /// Returns `true` for end-of-call kinds (`Return`, `Throws`).
    #[must_use]
    pub fn is_end_of_call(self) -> bool {
        matches!(self, Self::Return | Self::Throws)
    }

    /// Returns `true` for the synthesized compensation kinds.
    #[must_use]
    pub fn is_compensation(self) -> bool {
        matches!(self, Self::ImmediatelyReturn | Self::ImmediatelyThrows)
    }

    /// Returns the display name of this kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::Return => "RETURN",
            Self::Throws => "THROWS",
            Self::ImmediatelyReturn => "IMMEDIATELY_RETURN",
            Self::ImmediatelyThrows => "IMMEDIATELY_THROWS",
            Self::CallBefore => "CALL_BEFORE",
            Self::CallReturn => "CALL_RETURN",
            Self::CallThrows => "CALL_THROWS",
            Self::Line => "LINE",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
