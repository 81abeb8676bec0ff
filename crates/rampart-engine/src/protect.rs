//! Protected-region guard.
//!
//! The engine's own machinery (module loading, registry maintenance,
//! teardown) may itself execute instrumented code. Events produced
//! inside such a region must never re-enter dispatch or the engine
//! would observe — and potentially alter — itself, recursively. Every
//! callback entry point therefore checks [`Protector::is_protecting`]
//! first and becomes a no-op while any protected region is open.
//!
//! One `Protector` belongs to each [`EventHandler`](crate::EventHandler)
//! and is shared with whatever management layer drives it; the flag is
//! only ever *written* through [`enter`](Protector::enter), and only
//! *read* by the dispatch guard.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Re-entrant protected-region flag.
///
/// # Example
///
/// ```
/// use rampart_engine::Protector;
///
/// let protector = Protector::new();
/// assert!(!protector.is_protecting());
/// {
///     let _guard = protector.enter();
///     let _nested = protector.enter(); // re-entrant
///     assert!(protector.is_protecting());
/// }
/// assert!(!protector.is_protecting());
/// ```
#[derive(Debug, Default)]
pub struct Protector {
    depth: AtomicUsize,
}

impl Protector {
    /// Creates an unprotected protector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a protected region; closed when the guard drops.
    #[must_use = "the region closes as soon as the guard is dropped"]
    pub fn enter(&self) -> ProtectGuard<'_> {
        self.depth.fetch_add(1, Ordering::SeqCst);
        ProtectGuard { protector: self }
    }

    /// Returns `true` while any protected region is open.
    #[must_use]
    pub fn is_protecting(&self) -> bool {
        self.depth.load(Ordering::SeqCst) > 0
    }
}

/// RAII guard for one protected region.
#[derive(Debug)]
pub struct ProtectGuard<'a> {
    protector: &'a Protector,
}

impl Drop for ProtectGuard<'_> {
    fn drop(&mut self) {
        self.protector.depth.fetch_sub(1, Ordering::SeqCst);
    }
}
