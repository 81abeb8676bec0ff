//! Event processor: one registered listener plus its state.
//!
//! Binds a listener to its subscribed event kinds and owns the
//! per-thread [`CallProcess`] slots. Slots are partitioned by thread id;
//! only the owning thread reads or writes its slot during dispatch, so
//! the map is contended only by lifecycle cleanup.

use crate::CallProcess;
use dashmap::DashMap;
use rampart_event::{EventKind, EventListener};
use rampart_types::ListenerId;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// A registered listener with its subscription set, frozen flag, and
/// per-thread call processes.
pub struct EventProcessor {
    listener_id: ListenerId,
    listener: Arc<dyn EventListener>,
    event_kinds: HashSet<EventKind>,
    frozen: AtomicBool,
    processes: DashMap<ThreadId, CallProcess>,
}

impl EventProcessor {
    /// Creates a processor for the given listener and subscriptions.
    #[must_use]
    pub fn new(
        listener_id: ListenerId,
        listener: Arc<dyn EventListener>,
        event_kinds: impl IntoIterator<Item = EventKind>,
    ) -> Self {
        Self {
            listener_id,
            listener,
            event_kinds: event_kinds.into_iter().collect(),
            frozen: AtomicBool::new(false),
            processes: DashMap::new(),
        }
    }

    /// The listener's id.
    #[must_use]
    pub fn listener_id(&self) -> ListenerId {
        self.listener_id
    }

    /// The listener itself.
    #[must_use]
    pub fn listener(&self) -> &Arc<dyn EventListener> {
        &self.listener
    }

    /// Whether a failure in this listener interrupts the intercepted
    /// call.
    #[must_use]
    pub fn interrupting(&self) -> bool {
        self.listener.interrupting()
    }

    /// Returns `true` if the listener subscribed to `kind`.
    #[must_use]
    pub fn subscribes(&self, kind: EventKind) -> bool {
        self.event_kinds.contains(&kind)
    }

    /// The subscribed kinds.
    #[must_use]
    pub fn event_kinds(&self) -> &HashSet<EventKind> {
        &self.event_kinds
    }

    /// Soft-disables the processor without touching accumulated state.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::SeqCst);
    }

    /// Returns `true` if the processor is frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }

    /// Runs `f` against the calling thread's call process, creating the
    /// slot on first use.
    ///
    /// The slot lock is held only for the duration of `f`; `f` must not
    /// invoke the listener.
    pub fn with_process<R>(&self, f: impl FnOnce(&mut CallProcess) -> R) -> R {
        let mut slot = self
            .processes
            .entry(thread::current().id())
            .or_default();
        f(slot.value_mut())
    }

    /// Runs `f` against the calling thread's call process if the slot
    /// exists; never creates one.
    pub fn try_with_process<R>(&self, f: impl FnOnce(&mut CallProcess) -> R) -> Option<R> {
        self.processes
            .get_mut(&thread::current().id())
            .map(|mut slot| f(slot.value_mut()))
    }

    /// Destroys the calling thread's call process slot, if any.
    pub fn remove_thread_process(&self) {
        self.processes.remove(&thread::current().id());
    }

    /// Releases the call process slots of every thread. Used by bulk
    /// teardown of frozen processors; not safe concurrently with live
    /// dispatch for this listener.
    pub fn clean_thread_locals(&self) {
        self.processes.clear();
    }

    /// Number of threads currently holding a call process.
    #[must_use]
    pub fn thread_process_count(&self) -> usize {
        self.processes.len()
    }
}

impl std::fmt::Debug for EventProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventProcessor")
            .field("listener_id", &self.listener_id)
            .field("event_kinds", &self.event_kinds)
            .field("frozen", &self.is_frozen())
            .field("thread_processes", &self.processes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_event::testing::MockListener;
    use rampart_types::InvokeId;

    fn processor(kinds: &[EventKind]) -> EventProcessor {
        EventProcessor::new(
            ListenerId::new(1),
            Arc::new(MockListener::observer()),
            kinds.iter().copied(),
        )
    }

    // ── Subscriptions ────────────────────────────────────────

    #[test]
    fn subscribes_only_declared_kinds() {
        let processor = processor(&[EventKind::Before, EventKind::Return]);
        assert!(processor.subscribes(EventKind::Before));
        assert!(processor.subscribes(EventKind::Return));
        assert!(!processor.subscribes(EventKind::Throws));
        assert!(!processor.subscribes(EventKind::Line));
    }

    // ── Freeze ───────────────────────────────────────────────

    #[test]
    fn freeze_is_sticky_and_keeps_state() {
        let processor = processor(&[EventKind::Before]);
        processor.with_process(|p| p.push_invoke_id(InvokeId::new(1000)));

        assert!(!processor.is_frozen());
        processor.freeze();
        assert!(processor.is_frozen());

        // Accumulated state survives the freeze.
        assert_eq!(processor.thread_process_count(), 1);
        let depth = processor.try_with_process(|p| p.depth());
        assert_eq!(depth, Some(1));
    }

    // ── Thread-local slots ───────────────────────────────────

    #[test]
    fn with_process_creates_slot_on_demand() {
        let processor = processor(&[EventKind::Before]);
        assert_eq!(processor.thread_process_count(), 0);
        processor.with_process(|p| assert!(p.is_empty_stack()));
        assert_eq!(processor.thread_process_count(), 1);
    }

    #[test]
    fn try_with_process_never_creates() {
        let processor = processor(&[EventKind::Before]);
        assert_eq!(processor.try_with_process(|p| p.depth()), None);
        assert_eq!(processor.thread_process_count(), 0);
    }

    #[test]
    fn slots_are_partitioned_per_thread() {
        let processor = Arc::new(processor(&[EventKind::Before]));
        processor.with_process(|p| p.push_invoke_id(InvokeId::new(1)));

        let other = Arc::clone(&processor);
        std::thread::spawn(move || {
            // Fresh slot, not the main thread's.
            other.with_process(|p| {
                assert!(p.is_empty_stack());
                p.push_invoke_id(InvokeId::new(2));
            });
        })
        .join()
        .unwrap();

        assert_eq!(processor.thread_process_count(), 2);
        assert_eq!(
            processor.try_with_process(|p| p.get_invoke_id()),
            Some(Some(InvokeId::new(1)))
        );
    }

    #[test]
    fn remove_thread_process_only_touches_current_thread() {
        let processor = Arc::new(processor(&[EventKind::Before]));
        processor.with_process(|_| {});

        let other = Arc::clone(&processor);
        std::thread::spawn(move || other.with_process(|_| {}))
            .join()
            .unwrap();
        assert_eq!(processor.thread_process_count(), 2);

        processor.remove_thread_process();
        assert_eq!(processor.thread_process_count(), 1);
    }

    #[test]
    fn clean_thread_locals_releases_everything() {
        let processor = Arc::new(processor(&[EventKind::Before]));
        processor.with_process(|_| {});
        let other = Arc::clone(&processor);
        std::thread::spawn(move || other.with_process(|_| {}))
            .join()
            .unwrap();

        processor.clean_thread_locals();
        assert_eq!(processor.thread_process_count(), 0);
    }
}
