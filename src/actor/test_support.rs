//! Test-only helpers for constructing bare actor references.
//!
//! Not compiled outside `#[cfg(test)]` — see the `pub(crate)` gate in
//! [`super`].

use std::sync::Arc;

use crate::actor::cell::ActorCell;
use crate::actor::flavor::ActorFlavor;
use crate::actor::reference::ActorRef;
use crate::util::{ActorId, NodeId};

/// A local [`ActorRef`] backed by a freshly constructed, never-scheduled
/// [`ActorCell`]. Good enough for tests that only need somewhere to send
/// messages to or from.
pub fn spawn_bare_cell() -> ActorRef {
    ActorRef::Local(Arc::new(ActorCell::new(
        ActorId::next(),
        NodeId::generate(),
        ActorFlavor::EventBased,
    )))
}
