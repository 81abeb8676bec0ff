//! Invocation id sequencer.

use rampart_types::InvokeId;
use std::sync::atomic::{AtomicI32, Ordering};

/// Monotonically increasing allocator of invocation ids.
///
/// Starts at 1000 so low ids stay visually distinct from listener ids in
/// logs. The counter wraps on overflow; ids are only compared for
/// equality within the bounded call depth of one thread, so a collision
/// would require a single call tree deeper than the full i32 range and
/// is accepted as unreachable.
#[derive(Debug)]
pub struct InvokeIdSequencer {
    sequence: AtomicI32,
}

impl InvokeIdSequencer {
    /// First id handed out by [`new`](Self::new).
    pub const INITIAL: i32 = 1000;

    /// Creates a sequencer starting at [`INITIAL`](Self::INITIAL).
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Self::INITIAL)
    }

    /// Creates a sequencer starting at an arbitrary value.
    #[must_use]
    pub fn starting_at(start: i32) -> Self {
        Self {
            sequence: AtomicI32::new(start),
        }
    }

    /// Allocates the next invocation id.
    ///
    /// Uniqueness is all that matters here; callers never rely on
    /// cross-thread ordering of ids.
    pub fn next(&self) -> InvokeId {
        InvokeId::new(self.sequence.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for InvokeIdSequencer {
    fn default() -> Self {
        Self::new()
    }
}
