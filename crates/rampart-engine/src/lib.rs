//! Event interception and process-control engine for Rampart.
//!
//! This crate is the runtime core that sits between an instrumentation
//! layer and registered [`EventListener`](rampart_event::EventListener)
//! plugins. The instrumentation reports flat callbacks from intercepted
//! call sites; the engine correlates them into per-thread, per-listener
//! call stacks, dispatches typed events, and translates listener
//! answers into flow actions the call site applies — proceed, forced
//! return, or forced throw.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      EventHandler                             │
//! │                                                               │
//! │  ProcessorRegistry: listener_id → EventProcessor              │
//! │  InvokeIdSequencer: process-global id allocation              │
//! │  Protector: mutes callbacks from engine-internal regions      │
//! │  LoaderContext: loader resolution / current-loader binding    │
//! └──────────────────────┬───────────────────────────────────────┘
//!                        │ one per registered listener
//!                        ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  EventProcessor: listener + subscriptions + frozen flag       │
//! │    thread id → CallProcess (invocation stack, flags, factory) │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Lifecycle
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`EventHandler::activate`] | register/replace a listener |
//! | [`EventHandler::freeze`] | soft-disable, state preserved |
//! | [`EventHandler::remove`] | drop the registration |
//! | [`EventHandler::clean`] | full teardown |
//!
//! # Example
//!
//! ```
//! use rampart_engine::EventHandler;
//! use rampart_event::{EventKind, EventResponse, ProcessControl};
//! use rampart_event::testing::MockListener;
//! use rampart_types::ListenerId;
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! let handler = EventHandler::new();
//! let listener = Arc::new(MockListener::responder(|event| {
//!     // Veto calls whose first argument looks like an injection probe.
//!     if let rampart_event::Event::Before { args, .. } = event {
//!         if args.first() == Some(&json!("select 1 -- ")) {
//!             return Ok(EventResponse::Control(ProcessControl::throws_immediately(
//!                 json!({"type": "SecurityException"}),
//!             )));
//!         }
//!     }
//!     Ok(EventResponse::Continue)
//! }));
//! handler.activate(ListenerId::new(7), listener, [EventKind::Before]);
//!
//! let action = handler
//!     .on_before(
//!         ListenerId::new(7),
//!         None,
//!         "com.example.Dao",
//!         "query",
//!         "(Ljava/lang/String;)Ljava/lang/Object;",
//!         Value::Null,
//!         vec![json!("select 1 -- ")],
//!     )
//!     .unwrap();
//! assert!(action.is_throw());
//! ```

mod error;
mod flow;
mod handler;
mod loader;
mod process;
mod processor;
mod protect;
mod registry;
mod sequencer;

pub use error::EngineError;
pub use flow::FlowAction;
pub use handler::EventHandler;
pub use loader::{LoaderContext, NoopLoaderContext};
pub use process::CallProcess;
pub use processor::EventProcessor;
pub use protect::{ProtectGuard, Protector};
pub use registry::ProcessorRegistry;
pub use sequencer::InvokeIdSequencer;

// Re-export from rampart_types for convenience
pub use rampart_types::{InvokeId, ListenerId, LoaderHandle, ObjectId, ProcessId};
