//! Loader handle type.
//!
//! The loader-routing subsystem is an external collaborator; the engine
//! only ever needs an opaque, cloneable handle it can attach to a
//! begin-of-call event and hand back when binding the "current business
//! loader" for the remainder of the call.

use crate::ObjectId;
use serde::{Deserialize, Serialize};

/// Opaque handle to a class/code loader resolved by the loader-context
/// collaborator.
///
/// The engine never inspects the handle beyond logging its name; it is
/// carried on [`Before`]-kind events so listeners observe the loader
/// that services the intercepted class.
///
/// [`Before`]: https://docs.rs/rampart-event
///
/// # Example
///
/// ```
/// use rampart_types::{LoaderHandle, ObjectId};
///
/// let handle = LoaderHandle::new(ObjectId::new(11), "app");
/// assert_eq!(handle.name(), "app");
/// assert_eq!(handle.to_string(), "app#11");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderHandle {
    /// Object id the handle was resolved from.
    pub object_id: ObjectId,
    /// Human-readable loader name.
    pub name: String,
}

impl LoaderHandle {
    /// Creates a loader handle.
    #[must_use]
    pub fn new(object_id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            object_id,
            name: name.into(),
        }
    }

    /// Returns the loader name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for LoaderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.name, self.object_id)
    }
}
