//! Event construction.
//!
//! One [`EventFactory`] lives inside each per-thread call process; every
//! event dispatched for that process is built here so the id pair is
//! stamped consistently. Events are transient: the dispatch call owns
//! the event it builds and drops it after delivery, so no pooling or
//! recycling is involved.

use crate::Event;
use rampart_types::{InvokeId, LoaderHandle, ProcessId};
use serde_json::Value;

/// Factory for the events of one call process.
#[derive(Debug, Default, Clone)]
pub struct EventFactory {
    _private: (),
}

impl EventFactory {
    /// Creates a factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a begin-of-call event.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn make_before_event(
        &self,
        process_id: ProcessId,
        invoke_id: InvokeId,
        loader: Option<LoaderHandle>,
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        method_desc: impl Into<String>,
        target: Value,
        args: Vec<Value>,
    ) -> Event {
        Event::Before {
            process_id,
            invoke_id,
            loader,
            class_name: class_name.into(),
            method_name: method_name.into(),
            method_desc: method_desc.into(),
            target,
            args,
        }
    }

    /// Builds an end-of-call (return outcome) event.
    #[must_use]
    pub fn make_return_event(
        &self,
        process_id: ProcessId,
        invoke_id: InvokeId,
        value: Value,
    ) -> Event {
        Event::Return {
            process_id,
            invoke_id,
            value,
        }
    }

    /// Builds an end-of-call (throw outcome) event.
    #[must_use]
    pub fn make_throws_event(
        &self,
        process_id: ProcessId,
        invoke_id: InvokeId,
        thrown: Value,
    ) -> Event {
        Event::Throws {
            process_id,
            invoke_id,
            thrown,
        }
    }

    /// Builds a compensation event for a forced early return.
    #[must_use]
    pub fn make_immediately_return_event(
        &self,
        process_id: ProcessId,
        invoke_id: InvokeId,
        value: Value,
    ) -> Event {
        Event::ImmediatelyReturn {
            process_id,
            invoke_id,
            value,
        }
    }

    /// Builds a compensation event for a forced early throw.
    #[must_use]
    pub fn make_immediately_throws_event(
        &self,
        process_id: ProcessId,
        invoke_id: InvokeId,
        thrown: Value,
    ) -> Event {
        Event::ImmediatelyThrows {
            process_id,
            invoke_id,
            thrown,
        }
    }

    /// Builds a nested-call-begin event.
    #[must_use]
    pub fn make_call_before_event(
        &self,
        process_id: ProcessId,
        invoke_id: InvokeId,
        line: u32,
        owner: impl Into<String>,
        name: impl Into<String>,
        desc: impl Into<String>,
    ) -> Event {
        Event::CallBefore {
            process_id,
            invoke_id,
            line,
            owner: owner.into(),
            name: name.into(),
            desc: desc.into(),
        }
    }

    /// Builds a nested-call-return event.
    #[must_use]
    pub fn make_call_return_event(&self, process_id: ProcessId, invoke_id: InvokeId) -> Event {
        Event::CallReturn {
            process_id,
            invoke_id,
        }
    }

    /// Builds a nested-call-throws event.
    #[must_use]
    pub fn make_call_throws_event(
        &self,
        process_id: ProcessId,
        invoke_id: InvokeId,
        exception: impl Into<String>,
    ) -> Event {
        Event::CallThrows {
            process_id,
            invoke_id,
            exception: exception.into(),
        }
    }

    /// Builds a line-reached event.
    #[must_use]
    pub fn make_line_event(&self, process_id: ProcessId, invoke_id: InvokeId, line: u32) -> Event {
        Event::Line {
            process_id,
            invoke_id,
            line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;
    use serde_json::json;

    #[test]
    fn factory_stamps_ids() {
        let factory = EventFactory::new();
        let process_id = ProcessId::new(1000);
        let invoke_id = InvokeId::new(1001);

        let event = factory.make_return_event(process_id, invoke_id, json!(42));
        assert_eq!(event.process_id(), process_id);
        assert_eq!(event.invoke_id(), invoke_id);
        assert_eq!(event.kind(), EventKind::Return);
    }

    #[test]
    fn factory_builds_every_kind() {
        let factory = EventFactory::new();
        let pid = ProcessId::new(1);
        let iid = InvokeId::new(1);

        let kinds = [
            factory
                .make_before_event(pid, iid, None, "C", "m", "()V", Value::Null, vec![])
                .kind(),
            factory.make_return_event(pid, iid, Value::Null).kind(),
            factory.make_throws_event(pid, iid, Value::Null).kind(),
            factory
                .make_immediately_return_event(pid, iid, Value::Null)
                .kind(),
            factory
                .make_immediately_throws_event(pid, iid, Value::Null)
                .kind(),
            factory
                .make_call_before_event(pid, iid, 1, "O", "n", "()V")
                .kind(),
            factory.make_call_return_event(pid, iid).kind(),
            factory.make_call_throws_event(pid, iid, "E").kind(),
            factory.make_line_event(pid, iid, 10).kind(),
        ];

        assert_eq!(
            kinds,
            [
                EventKind::Before,
                EventKind::Return,
                EventKind::Throws,
                EventKind::ImmediatelyReturn,
                EventKind::ImmediatelyThrows,
                EventKind::CallBefore,
                EventKind::CallReturn,
                EventKind::CallThrows,
                EventKind::Line,
            ]
        );
    }
}
