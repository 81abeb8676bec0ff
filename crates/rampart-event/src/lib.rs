//! Listener SDK for Rampart.
//!
//! This crate defines everything a plugin listener sees: the event
//! vocabulary, the listener trait, and the control-transfer types with
//! which a listener can veto or redirect an intercepted call.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Plugin SDK Layer                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  rampart-types  : ids, LoaderHandle, ErrorCode              │
//! │  rampart-event  : Event, EventListener, ProcessControl ◄──  │
//! └─────────────────────────────────────────────────────────────┘
//!                              ▲
//!                              │ dispatched by
//! ┌─────────────────────────────────────────────────────────────┐
//! │  rampart-engine : registry, call processes, dispatch        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Event Flow
//!
//! ```text
//! instrumented call site
//!     │ callback (one of seven)
//!     ▼
//! EventHandler ── builds ──► Event { kind, process_id, invoke_id, .. }
//!     │ on_event(&event)
//!     ▼
//! EventListener
//!     │ Ok(Continue) / Ok(Control(..)) / Err(..)
//!     ▼
//! EventHandler ── resolves ──► FlowAction { None | Return | Throw }
//! ```
//!
//! # Subscriptions
//!
//! A listener subscribes to a set of [`EventKind`]s at activation; it is
//! never invoked for kinds outside that set. The two
//! `Immediately*` kinds are legacy: they are only synthesized as
//! *compensation* events when a listener that subscribes to them raises
//! the corresponding control transfer.
//!
//! # Control transfer
//!
//! ```
//! use rampart_event::{Event, EventError, EventKind, EventListener, EventResponse,
//!     ProcessControl};
//! use serde_json::json;
//!
//! /// Blocks every intercepted call by forcing it to throw.
//! struct DenyAll;
//!
//! impl EventListener for DenyAll {
//!     fn on_event(&self, event: &Event) -> Result<EventResponse, EventError> {
//!         if event.kind() == EventKind::Before {
//!             return Ok(EventResponse::Control(ProcessControl::throws_immediately(
//!                 json!({"type": "SecurityException", "message": "blocked"}),
//!             )));
//!         }
//!         Ok(EventResponse::Continue)
//!     }
//! }
//! ```
//!
//! # Crate Structure
//!
//! - [`EventKind`], [`Event`], [`EventFactory`] — the event vocabulary
//! - [`EventListener`] — the plugin contract
//! - [`ProcessControl`], [`ControlState`], [`EventResponse`] — control transfer
//! - [`EventError`] — listener faults
//! - `testing` (feature `test-utils`) — [`MockListener`](testing::MockListener)

mod control;
mod error;
mod event;
mod factory;
mod kind;
mod listener;

pub use control::{ControlState, EventResponse, ProcessControl};
pub use error::EventError;
pub use event::Event;
pub use factory::EventFactory;
pub use kind::EventKind;
pub use listener::EventListener;

#[cfg(any(test, feature = "test-utils"))]
pub use listener::testing;

// Re-export from rampart_types for convenience
pub use rampart_types::{InvokeId, ListenerId, LoaderHandle, ProcessId};
