//! Test-only helpers shared by other modules' test code.
//!
//! Not compiled outside `#[cfg(test)]` — see the `pub(crate)` gate in
//! [`super`].

use crate::actor::test_support::spawn_bare_cell;
use crate::actor::ActorRef;

/// A local [`ActorRef`] good enough to stand in for a sender or receiver in
/// tests that never actually schedule the actor.
pub fn local_ref_for_test() -> ActorRef {
    spawn_bare_cell()
}
