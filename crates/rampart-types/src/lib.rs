//! Core types for Rampart.
//!
//! Rampart is a runtime self-protection agent: selected methods of a
//! running program are instrumented to emit interception callbacks, and
//! plugin-supplied listeners observe those callbacks and may veto or
//! redirect the intercepted call. This crate is the bottom of the stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Plugin SDK Layer                        │
//! ├─────────────────────────────────────────────────────────┤
//! │  rampart-types  : ids, LoaderHandle, ErrorCode ◄── HERE │
//! │  rampart-event  : Event, EventListener, ProcessControl  │
//! ├─────────────────────────────────────────────────────────┤
//! │  rampart-engine : CallProcess, registry, dispatch       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier model
//!
//! | Type | Assigned by | Scope |
//! |------|-------------|-------|
//! | [`ListenerId`] | module-lifecycle manager | global, overwrite-by-id |
//! | [`InvokeId`] | engine sequencer | one intercepted execution |
//! | [`ProcessId`] | bottom of the call-process stack | one call tree |
//! | [`ObjectId`] | loader-context collaborator | opaque |
//!
//! # Error Handling
//!
//! All workspace error types implement [`ErrorCode`]; the
//! [`assert_error_code`]/[`assert_error_codes`] helpers keep the code
//! vocabulary honest from tests.

mod error;
mod id;
mod loader;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{InvokeId, ListenerId, ObjectId, ProcessId};
pub use loader::LoaderHandle;
