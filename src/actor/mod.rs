//! Actors: cells, references, behaviors, and the context handlers run in.
//!
//! An actor is identified by an [`ActorId`](crate::util::ActorId) and
//! addressed through an [`ActorRef`], which hides whether the actor is
//! local ([`cell::ActorCell`]) or remote (a
//! [`crate::transport::proxy::ProxyActor`]). Its behavior is not a trait
//! implementation but a value — a [`crate::pattern::MatchExpression`]
//! installed via [`context::ActorContext::become_`] — so there is no
//! generic `Actor` type here to implement against (spec.md §3, §4.1).

pub mod cell;
pub mod context;
pub mod exit;
pub mod flavor;
pub mod lifecycle;
pub mod reference;

#[cfg(test)]
pub mod test_support;

pub use cell::{ActorCell, ActorWorkerState};
pub use context::{ActorContext, Initializer};
pub use exit::ExitReason;
pub use flavor::ActorFlavor;
pub use lifecycle::{ActorLifecycle, ActorState};
pub use reference::{send, ActorRef};
