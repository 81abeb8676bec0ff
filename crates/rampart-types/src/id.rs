//! Identifier types for Rampart.
//!
//! All identifiers are plain integers. Listener ids are assigned by the
//! module-lifecycle manager outside this engine; invocation ids come from
//! the engine's own sequencer and are only ever compared within a single
//! thread, so no global uniqueness scheme (UUID or otherwise) is needed.

use serde::{Deserialize, Serialize};

/// Identifier for a registered event listener.
///
/// Assigned externally by the module-lifecycle manager when a plugin
/// module is loaded. Re-activating an id overwrites the previous
/// registration, so uniqueness is by convention of the assigner.
///
/// # Example
///
/// ```
/// use rampart_types::ListenerId;
///
/// let id = ListenerId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(i32);

impl ListenerId {
    /// Creates a listener id from its raw integer value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ListenerId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Identifier of one execution of an intercepted call.
///
/// Allocated from a monotonically increasing sequencer. Wraparound is
/// tolerated: ids are only used for correlation within the bounded call
/// depth of a single thread, never as a global key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvokeId(i32);

impl InvokeId {
    /// Creates an invocation id from its raw integer value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for InvokeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a call tree: the invocation id of the outermost call in
/// the current nested-call tree for a thread/listener pair.
///
/// A process id is always some invocation id promoted when it lands at
/// the bottom of the call-process stack, hence the `From<InvokeId>`
/// conversion.
///
/// # Example
///
/// ```
/// use rampart_types::{InvokeId, ProcessId};
///
/// let invoke = InvokeId::new(1000);
/// let process = ProcessId::from(invoke);
/// assert_eq!(process.value(), 1000);
/// assert!(process.matches(invoke));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessId(i32);

impl ProcessId {
    /// Creates a process id from its raw integer value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Returns `true` if this process id equals the given invocation id,
    /// i.e. the invocation is the outermost call of its tree.
    #[must_use]
    pub fn matches(self, invoke_id: InvokeId) -> bool {
        self.0 == invoke_id.value()
    }
}

impl From<InvokeId> for ProcessId {
    fn from(invoke_id: InvokeId) -> Self {
        Self(invoke_id.value())
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of an object held by the loader-context
/// collaborator (e.g. the defining loader of an intercepted class).
///
/// The engine never interprets this value; it only forwards it to
/// [`lookup`](crate::LoaderHandle)-style collaborator calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Creates an object id from its raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
