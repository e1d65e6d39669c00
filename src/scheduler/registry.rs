//! The process-wide table of locally scheduled actors.
//!
//! Keyed by [`ActorId`] rather than by [`ActorRef`] so a lookup only needs
//! the id carried on an envelope or a wire message, never a live reference.

// Layer 1: Standard library imports
use std::sync::{Arc, OnceLock};

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::actor::{ActorCell, ActorWorkerState};
use crate::util::ActorId;

/// One locally scheduled actor: its shared [`ActorCell`] plus the
/// worker-exclusive state, when the actor is schedulable at all.
///
/// Blocking-flavor actors (spec.md §4.4) never have their `worker` filled
/// in — they drive their own control flow on a dedicated thread via
/// [`crate::actor::ActorContext::receive`] — but are still registered here
/// so lookups, monitors, and [`super::await_all_others_done`] see them.
pub struct ActorSlot {
    pub cell: Arc<ActorCell>,
    pub worker: Mutex<Option<ActorWorkerState>>,
}

impl ActorSlot {
    pub fn schedulable(cell: Arc<ActorCell>, worker_state: ActorWorkerState) -> Self {
        Self {
            cell,
            worker: Mutex::new(Some(worker_state)),
        }
    }

    pub fn unschedulable(cell: Arc<ActorCell>) -> Self {
        Self {
            cell,
            worker: Mutex::new(None),
        }
    }
}

static REGISTRY: OnceLock<DashMap<ActorId, Arc<ActorSlot>>> = OnceLock::new();

fn table() -> &'static DashMap<ActorId, Arc<ActorSlot>> {
    REGISTRY.get_or_init(DashMap::new)
}

pub fn insert(id: ActorId, slot: Arc<ActorSlot>) {
    table().insert(id, slot);
}

pub fn lookup(id: ActorId) -> Option<Arc<ActorSlot>> {
    table().get(&id).map(|entry| Arc::clone(entry.value()))
}

pub fn remove(id: ActorId) {
    table().remove(&id);
}

/// Count of still-registered actors other than `excluding`, used by
/// [`super::await_all_others_done`].
pub fn alive_count_excluding(excluding: ActorId) -> usize {
    table().iter().filter(|entry| *entry.key() != excluding).count()
}

/// Count of every still-registered actor, used by [`super::shutdown`] (which
/// has no "caller" actor to exclude — it is typically called from outside
/// any actor's own context).
pub fn alive_count() -> usize {
    table().len()
}
