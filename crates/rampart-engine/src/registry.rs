//! Processor registry — global listener-id → processor mapping.
//!
//! Registration and removal run concurrently with live interception on
//! arbitrary program threads, so the map itself is concurrent; no
//! external locking is required by callers.

use crate::EventProcessor;
use dashmap::DashMap;
use rampart_event::{EventKind, EventListener};
use rampart_types::ListenerId;
use std::sync::Arc;
use tracing::info;

/// Registry of all active event processors.
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: DashMap<ListenerId, Arc<EventProcessor>>,
}

impl ProcessorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the processor for `listener_id`.
    ///
    /// Re-activating an id discards the previous registration along
    /// with its accumulated per-thread state.
    pub fn activate(
        &self,
        listener_id: ListenerId,
        listener: Arc<dyn EventListener>,
        event_kinds: impl IntoIterator<Item = EventKind>,
    ) {
        let processor = Arc::new(EventProcessor::new(listener_id, listener, event_kinds));
        info!(
            %listener_id,
            kinds = ?processor.event_kinds(),
            "activated listener"
        );
        self.processors.insert(listener_id, processor);
    }

    /// Soft-disables the processor for `listener_id` without destroying
    /// its state. No-op if absent.
    pub fn freeze(&self, listener_id: ListenerId) {
        let Some(processor) = self.processors.get(&listener_id) else {
            return;
        };
        processor.freeze();
        info!(%listener_id, "frozen listener");
    }

    /// Removes the processor for `listener_id`. No-op if absent.
    pub fn remove(&self, listener_id: ListenerId) {
        if self.processors.remove(&listener_id).is_some() {
            info!(%listener_id, "removed listener");
        }
    }

    /// Looks up the processor for `listener_id`.
    #[must_use]
    pub fn get(&self, listener_id: ListenerId) -> Option<Arc<EventProcessor>> {
        self.processors
            .get(&listener_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Full teardown: releases the per-thread state of every processor
    /// still frozen, then clears the registry.
    ///
    /// Not safe to call concurrently with active dispatch.
    pub fn clean(&self) {
        for entry in self.processors.iter() {
            if entry.value().is_frozen() {
                entry.value().clean_thread_locals();
            }
        }
        self.processors.clear();
        info!("processor registry cleaned");
    }

    /// Number of registered processors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Returns `true` if no processor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_event::testing::MockListener;
    use rampart_types::InvokeId;

    fn listener() -> Arc<dyn EventListener> {
        Arc::new(MockListener::observer())
    }

    // ── Lifecycle ────────────────────────────────────────────

    #[test]
    fn activate_then_get() {
        let registry = ProcessorRegistry::new();
        let id = ListenerId::new(7);
        registry.activate(id, listener(), [EventKind::Before]);

        let processor = registry.get(id).expect("registered");
        assert_eq!(processor.listener_id(), id);
        assert!(processor.subscribes(EventKind::Before));
    }

    #[test]
    fn get_absent_is_none() {
        let registry = ProcessorRegistry::new();
        assert!(registry.get(ListenerId::new(1)).is_none());
    }

    #[test]
    fn reactivate_discards_prior_state() {
        let registry = ProcessorRegistry::new();
        let id = ListenerId::new(7);
        registry.activate(id, listener(), [EventKind::Before]);
        registry
            .get(id)
            .unwrap()
            .with_process(|p| p.push_invoke_id(InvokeId::new(1000)));

        registry.activate(id, listener(), [EventKind::Return]);
        let replaced = registry.get(id).unwrap();
        assert!(!replaced.subscribes(EventKind::Before));
        assert_eq!(replaced.thread_process_count(), 0);
    }

    #[test]
    fn freeze_flags_without_removal() {
        let registry = ProcessorRegistry::new();
        let id = ListenerId::new(7);
        registry.activate(id, listener(), [EventKind::Before]);

        registry.freeze(id);
        assert!(registry.get(id).unwrap().is_frozen());
        assert_eq!(registry.len(), 1);

        // Freezing an unknown id is a no-op.
        registry.freeze(ListenerId::new(99));
    }

    #[test]
    fn remove_deletes_record() {
        let registry = ProcessorRegistry::new();
        let id = ListenerId::new(7);
        registry.activate(id, listener(), [EventKind::Before]);

        registry.remove(id);
        assert!(registry.get(id).is_none());
        assert!(registry.is_empty());

        // Removing again is a no-op.
        registry.remove(id);
    }

    // ── Bulk teardown ────────────────────────────────────────

    #[test]
    fn clean_releases_frozen_state_and_clears_all() {
        let registry = ProcessorRegistry::new();
        let frozen_id = ListenerId::new(1);
        let live_id = ListenerId::new(2);
        registry.activate(frozen_id, listener(), [EventKind::Before]);
        registry.activate(live_id, listener(), [EventKind::Before]);

        let frozen = registry.get(frozen_id).unwrap();
        frozen.with_process(|p| p.push_invoke_id(InvokeId::new(1000)));
        registry.freeze(frozen_id);

        registry.clean();
        assert!(registry.is_empty());
        // Thread-local state of the frozen processor was released.
        assert_eq!(frozen.thread_process_count(), 0);
    }
}
