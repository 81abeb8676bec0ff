//! Loader-context collaborator interface.
//!
//! Which loader services which class is decided by an external routing
//! subsystem. The engine consumes exactly two capabilities from it:
//! resolving an opaque object id to a [`LoaderHandle`] (attached to
//! begin-of-call events so listeners see the right context), and a
//! scoped bind/clear of the "current business loader" for the duration
//! of an intercepted call. Lookup misses are ignored — a missing loader
//! never affects dispatch.

use rampart_types::{LoaderHandle, ObjectId};

/// External loader-routing collaborator.
pub trait LoaderContext: Send + Sync {
    /// Resolves an opaque object id to a loader handle, if known.
    fn lookup(&self, object_id: ObjectId) -> Option<LoaderHandle>;

    /// Binds the current business loader for the calling thread, for
    /// the remainder of the intercepted call.
    fn bind_current(&self, loader: LoaderHandle);

    /// Clears the current business loader binding for the calling
    /// thread. Called at every end-of-call, matched or not.
    fn clear_current(&self);
}

/// Loader context that resolves nothing and binds nothing.
///
/// The default collaborator when the engine runs without the routing
/// subsystem (tests, standalone use).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLoaderContext;

impl LoaderContext for NoopLoaderContext {
    fn lookup(&self, _object_id: ObjectId) -> Option<LoaderHandle> {
        None
    }

    fn bind_current(&self, _loader: LoaderHandle) {}

    fn clear_current(&self) {}
}
