//! End-to-end dispatch scenarios through the public engine API.
//!
//! Each test drives an [`EventHandler`] the way an instrumentation layer
//! would: lifecycle calls plus the seven callbacks, observed through a
//! `MockListener`. Unit-level behavior of the individual pieces lives in
//! the crate's inline test modules; this suite covers whole-call-tree
//! flows and cross-thread partitioning.

use rampart_engine::{EventHandler, FlowAction};
use rampart_event::testing::MockListener;
use rampart_event::{Event, EventKind, EventResponse, ProcessControl};
use rampart_types::{InvokeId, ListenerId, ProcessId};
use serde_json::{json, Value};
use std::sync::Arc;

const LID: ListenerId = ListenerId::new(7);

fn begin(handler: &EventHandler) -> FlowAction {
    handler
        .on_before(
            LID,
            None,
            "com.example.Dao",
            "query",
            "(Ljava/lang/String;)Ljava/lang/Object;",
            Value::Null,
            vec![json!("select 1")],
        )
        .expect("dispatch")
}

#[test]
fn observe_a_complete_call() {
    let handler = EventHandler::new();
    let listener = Arc::new(MockListener::observer());
    handler.activate(
        LID,
        Arc::clone(&listener) as _,
        [EventKind::Before, EventKind::Return],
    );

    assert!(begin(&handler).is_none());
    assert!(handler.on_return(LID, json!("x")).unwrap().is_none());

    let events = listener.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].invoke_id(), InvokeId::new(1000));
    match &events[1] {
        Event::Return { value, .. } => assert_eq!(value, &json!("x")),
        other => panic!("expected Return, got {other:?}"),
    }

    // Stack empty afterward: the thread slot is gone.
    let processor = handler.registry().get(LID).expect("registered");
    assert_eq!(processor.thread_process_count(), 0);
}

#[test]
fn veto_with_forced_return_and_compensation() {
    let handler = EventHandler::new();
    let listener = Arc::new(MockListener::returner(json!(42)));
    handler.activate(
        LID,
        Arc::clone(&listener) as _,
        [EventKind::Before, EventKind::ImmediatelyReturn],
    );

    let action = begin(&handler);
    assert_eq!(action, FlowAction::Return(json!(42)));

    let kinds = listener.kinds();
    assert_eq!(kinds, vec![EventKind::Before, EventKind::ImmediatelyReturn]);

    // No end callback arrives for a vetoed call; a stray one later must
    // not be attributed to it.
    assert!(handler.on_return(LID, json!("late")).unwrap().is_none());
    assert_eq!(listener.calls(), 2);
}

#[test]
fn unmatched_end_of_call_is_a_noop() {
    let handler = EventHandler::new();
    let listener = Arc::new(MockListener::observer());
    handler.activate(
        LID,
        Arc::clone(&listener) as _,
        [EventKind::Return, EventKind::Throws],
    );

    assert!(handler.on_return(LID, json!("x")).unwrap().is_none());
    assert!(handler.on_throws(LID, json!("E")).unwrap().is_none());
    assert_eq!(listener.calls(), 0);

    let processor = handler.registry().get(LID).expect("registered");
    assert_eq!(processor.thread_process_count(), 0);
}

#[test]
fn depth_returns_to_zero_for_properly_nested_sequences() {
    let handler = EventHandler::new();
    let listener = Arc::new(MockListener::observer());
    handler.activate(
        LID,
        Arc::clone(&listener) as _,
        [EventKind::Before, EventKind::Return, EventKind::Throws],
    );
    let processor = handler.registry().get(LID).expect("registered");

    // a( b( c() ) d() ) with c throwing, caught inside b.
    begin(&handler); // a = 1000
    begin(&handler); // b = 1001
    begin(&handler); // c = 1002
    handler.on_throws(LID, json!("E")).unwrap();
    assert_eq!(processor.try_with_process(|p| p.depth()), Some(2));
    begin(&handler); // d = 1003
    handler.on_return(LID, Value::Null).unwrap();
    handler.on_return(LID, Value::Null).unwrap();
    assert_eq!(processor.try_with_process(|p| p.depth()), Some(1));
    handler.on_return(LID, Value::Null).unwrap();

    // All begun calls ended: depth back to zero, slot released.
    assert_eq!(processor.thread_process_count(), 0);

    // Every event stayed anchored at the outermost invocation.
    assert!(listener
        .events()
        .iter()
        .all(|e| e.process_id() == ProcessId::new(1000)));
}

#[test]
fn forced_throw_is_consumed_exactly_once() {
    // The forced throw is raised from a nested-call annotation, so the
    // frame stays on the stack until its own throws callback passes the
    // value through.
    let handler = EventHandler::new();
    let listener = Arc::new(MockListener::responder(|event| {
        Ok(match event.kind() {
            EventKind::CallBefore => {
                EventResponse::Control(ProcessControl::throws_immediately(json!("blocked")))
            }
            _ => EventResponse::Continue,
        })
    }));
    handler.activate(
        LID,
        Arc::clone(&listener) as _,
        [EventKind::Before, EventKind::CallBefore, EventKind::Throws],
    );

    begin(&handler);
    handler
        .on_call_before(LID, 10, "java/io/File", "delete", "()Z")
        .unwrap();

    // The frame terminates with the forced throw; no re-dispatch.
    let action = handler.on_throws(LID, json!("blocked")).unwrap();
    assert_eq!(action, FlowAction::Throw(json!("blocked")));
    assert_eq!(listener.kinds(), vec![EventKind::Before, EventKind::CallBefore]);
}

#[test]
fn subscription_filtering_is_strict() {
    let handler = EventHandler::new();
    let listener = Arc::new(MockListener::observer());
    handler.activate(LID, Arc::clone(&listener) as _, [EventKind::Before]);

    begin(&handler);
    handler.on_line(LID, 3).unwrap();
    handler.on_call_before(LID, 4, "O", "n", "()V").unwrap();
    handler.on_call_return(LID).unwrap();
    handler.on_return(LID, json!("x")).unwrap();

    begin(&handler);
    handler.on_throws(LID, json!("E")).unwrap();

    // Only the two Before events got through.
    assert_eq!(listener.kinds(), vec![EventKind::Before, EventKind::Before]);
}

#[test]
fn frozen_processor_keeps_state_until_removed() {
    let handler = EventHandler::new();
    let listener = Arc::new(MockListener::observer());
    handler.activate(
        LID,
        Arc::clone(&listener) as _,
        [EventKind::Before, EventKind::Return],
    );

    begin(&handler);
    handler.freeze(LID);

    // Muted, but the in-flight stack survives.
    assert!(begin(&handler).is_none());
    assert!(handler.on_return(LID, Value::Null).unwrap().is_none());
    assert_eq!(listener.calls(), 1);

    let processor = handler.registry().get(LID).expect("still registered");
    assert_eq!(processor.try_with_process(|p| p.depth()), Some(1));

    handler.remove(LID);
    assert!(handler.registry().get(LID).is_none());
}

#[test]
fn clean_tears_everything_down() {
    let handler = EventHandler::new();
    let observer = Arc::new(MockListener::observer());
    handler.activate(
        ListenerId::new(1),
        Arc::clone(&observer) as _,
        [EventKind::Before],
    );
    handler.activate(
        ListenerId::new(2),
        Arc::new(MockListener::observer()) as _,
        [EventKind::Before],
    );

    handler
        .on_before(ListenerId::new(1), None, "C", "m", "()V", Value::Null, vec![])
        .unwrap();
    handler.freeze(ListenerId::new(1));

    handler.clean();
    assert!(handler.registry().is_empty());
}

#[test]
fn threads_hold_independent_call_trees() {
    let handler = Arc::new(EventHandler::new());
    let listener = Arc::new(MockListener::observer());
    handler.activate(
        LID,
        Arc::clone(&listener) as _,
        [EventKind::Before, EventKind::Return],
    );

    let mut workers = Vec::new();
    for _ in 0..4 {
        let handler = Arc::clone(&handler);
        workers.push(std::thread::spawn(move || {
            for _ in 0..25 {
                begin(&handler);
                begin(&handler);
                handler.on_return(LID, Value::Null).unwrap();
                handler.on_return(LID, Value::Null).unwrap();
            }
        }));
    }
    for worker in workers {
        worker.join().unwrap();
    }

    // 4 threads × 25 trees × (2 Before + 2 Return).
    assert_eq!(listener.calls(), 400);

    // Each tree's events pair an outer and an inner invocation; ids
    // never collide across threads, so every Before has a matching
    // Return with the same invoke id.
    let mut open: std::collections::HashSet<InvokeId> = std::collections::HashSet::new();
    for event in listener.events() {
        match event.kind() {
            EventKind::Before => assert!(open.insert(event.invoke_id())),
            EventKind::Return => assert!(open.remove(&event.invoke_id())),
            other => panic!("unexpected kind {other}"),
        }
    }
    assert!(open.is_empty());

    // Every per-thread slot was released when its tree completed.
    let processor = handler.registry().get(LID).expect("registered");
    assert_eq!(processor.thread_process_count(), 0);
}

#[test]
fn two_listeners_track_the_same_call_independently() {
    let handler = EventHandler::new();
    let observer = Arc::new(MockListener::observer());
    let blocker = Arc::new(MockListener::returner(json!("blocked")));
    handler.activate(
        ListenerId::new(1),
        Arc::clone(&observer) as _,
        [EventKind::Before, EventKind::Return],
    );
    handler.activate(
        ListenerId::new(2),
        Arc::clone(&blocker) as _,
        [EventKind::Before],
    );

    // The instrumentation issues the callbacks per addressed listener.
    let action = handler
        .on_before(ListenerId::new(1), None, "C", "m", "()V", Value::Null, vec![])
        .unwrap();
    assert!(action.is_none());
    let action = handler
        .on_before(ListenerId::new(2), None, "C", "m", "()V", Value::Null, vec![])
        .unwrap();
    assert_eq!(action, FlowAction::Return(json!("blocked")));

    // Listener 1 still sees its Return; listener 2's frame was vetoed.
    handler.on_return(ListenerId::new(1), json!("x")).unwrap();
    assert_eq!(observer.kinds(), vec![EventKind::Before, EventKind::Return]);
    assert_eq!(blocker.kinds(), vec![EventKind::Before]);

    // Ids are allocated from one process-global sequencer.
    assert_eq!(observer.events()[0].invoke_id(), InvokeId::new(1000));
    assert_eq!(blocker.events()[0].invoke_id(), InvokeId::new(1001));
}
