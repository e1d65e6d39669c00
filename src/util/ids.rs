//! Process-local and process-wide identifiers.

// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Layer 3: Internal module imports
// (none)

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique actor identifier.
///
/// Allocated from a monotonic counter rather than a UUID: spec.md §3 only
/// requires uniqueness within the owning process, with global uniqueness
/// coming from pairing an `ActorId` with the process's [`NodeId`].
///
/// # Example
/// ```rust
/// use haven_actors::util::ActorId;
///
/// let a = ActorId::next();
/// let b = ActorId::next();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Allocate the next process-unique actor id.
    pub fn next() -> Self {
        Self(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Reconstruct an `ActorId` from its wire representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer, as carried on the wire (spec.md §6).
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 128-bit fingerprint chosen once per process at bootstrap.
///
/// Paired with an [`ActorId`], a `NodeId` makes an actor globally unique
/// across a distributed system (spec.md §3, invariant 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u128);

impl NodeId {
    /// Generate a fresh node fingerprint.
    ///
    /// Uses UUIDv4 entropy (the only source of process-wide randomness this
    /// crate needs for identity) but stores the result as a bare `u128`
    /// since the wire protocol transmits it as a raw 128-bit field, not a
    /// UUID string.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().as_u128())
    }

    /// Reconstruct a `NodeId` from its wire representation.
    pub fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// The raw 128-bit value, as carried on the wire.
    pub fn as_raw(&self) -> u128 {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// A fully qualified actor address: local id plus owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalActorId {
    pub node: NodeId,
    pub actor: ActorId,
}

impl GlobalActorId {
    pub fn new(node: NodeId, actor: ActorId) -> Self {
        Self { node, actor }
    }
}

impl Display for GlobalActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.actor, self.node)
    }
}

/// Identifier for an outstanding `sync_send` request.
///
/// Unique within the lifetime of the issuing actor (spec.md §3, invariant
/// 5); `0` is reserved on the wire to mean "no request" (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    pub fn from_raw(raw: u64) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req:{}", self.0)
    }
}

/// Allocates fresh [`RequestId`] values for a single actor.
///
/// Kept as a tiny per-actor counter (rather than a global) because
/// spec.md §3 only requires per-actor uniqueness, never reusing `0`.
#[derive(Debug)]
pub struct RequestIdAllocator {
    next: AtomicU64,
}

impl RequestIdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn allocate(&self) -> RequestId {
        let raw = self.next.fetch_add(1, Ordering::Relaxed);
        #[allow(clippy::unwrap_used)]
        RequestId::from_raw(raw).unwrap()
    }
}

impl Default for RequestIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
