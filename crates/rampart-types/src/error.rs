//! Unified error interface for Rampart.
//!
//! Every error type in the workspace implements [`ErrorCode`] so that
//! the engine, the listener SDK, and the management surface report
//! failures in one machine-readable vocabulary.
//!
//! # Code Format
//!
//! - **UPPER_SNAKE_CASE**, e.g. `"ENGINE_LISTENER_INTERRUPTED"`
//! - **Prefixed by crate domain**: `EVENT_` for the listener SDK,
//!   `ENGINE_` for the interception engine
//! - **Stable**: codes are an API contract and never change once shipped
//!
//! # Recoverability
//!
//! Recoverable means retrying the operation may succeed. Almost nothing
//! in this engine is: its whole error policy is "drop and continue", so
//! the few errors that *do* surface (an interrupting listener failing)
//! are terminal for the intercepted call.
//!
//! # Example
//!
//! ```
//! use rampart_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum DemoError {
//!     Desync,
//! }
//!
//! impl ErrorCode for DemoError {
//!     fn code(&self) -> &'static str {
//!         "DEMO_DESYNC"
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         false
//!     }
//! }
//!
//! assert_eq!(DemoError::Desync.code(), "DEMO_DESYNC");
//! ```

/// Unified error code interface.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    ///
    /// UPPER_SNAKE_CASE, domain-prefixed, stable across versions.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the failed operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates a single error code: non-empty, correctly prefixed,
/// UPPER_SNAKE_CASE.
///
/// Panics with a descriptive message if validation fails. Intended for
/// use from tests.
///
/// # Example
///
/// ```
/// use rampart_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// struct Oops;
///
/// impl ErrorCode for Oops {
///     fn code(&self) -> &'static str { "ENGINE_OOPS" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&Oops, "ENGINE_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every variant of an error enum at once.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
