//! # haven-actors — an Erlang-style actor runtime
//!
//! Actors are not a trait implementation: an actor's behavior is a value, a
//! [`pattern::MatchExpression`] installed via [`actor::ActorContext::become_`],
//! matched against untyped, tuple-shaped [`payload::Payload`]s rather than a
//! closed `Message` enum. This buys the same flexibility BEAM processes have
//! — `become` to change behavior at runtime, `receive` to block selectively,
//! link/monitor for supervision, a wire protocol for location transparency —
//! at the cost of the compile-time message-type checking a generic
//! `Actor<M>` trait would otherwise give you.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use haven_actors::actor::{ActorContext, ActorFlavor};
//! use haven_actors::pattern::MatchExpression;
//! use haven_actors::scheduler::{spawn, SpawnOptions};
//! use haven_actors::{atom::intern, pattern_match, payload};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let counter = spawn(
//!     ActorFlavor::EventBased,
//!     Box::new(|ctx: &mut ActorContext<'_>| {
//!         ctx.become_(
//!             MatchExpression::builder()
//!                 .case(
//!                     pattern_match![intern("increment")],
//!                     Arc::new(|ctx: &mut ActorContext<'_>, _bindings| {
//!                         ctx.reply(1i64);
//!                     }),
//!                 )
//!                 .build(),
//!         );
//!     }),
//!     SpawnOptions::default(),
//! );
//! haven_actors::actor::send(counter.clone(), &counter, payload![intern("increment")]);
//! # }
//! ```
//!
//! # Module organization
//!
//! - [`actor`] — the actor cell, its shared state, and the context handlers
//!   run against
//! - [`pattern`] — [`pattern::MatchExpression`]s: the behaviors actors
//!   `become`
//! - [`payload`] — the untyped tuple values messages carry
//! - [`atom`] — interned symbolic tags
//! - [`message`] — the envelope that carries a payload between actors
//! - [`mailbox`] — the per-actor message queue
//! - [`sync`] — the continuation table behind `sync_send`
//! - [`group`] — named, process-wide pub/sub groups
//! - [`scheduler`] — spawn, the worker pool, and exit/link propagation
//! - [`transport`] — cross-node addressing: TCP connections, the wire
//!   codec, and remote-actor proxies
//! - [`monitoring`] — structured observability events for every subsystem
//!   above
//! - [`system`] — process-wide configuration and bootstrap/shutdown
//! - [`util`] — ids shared across the crate
//!
//! # Non-goals
//!
//! This crate does not implement supervision trees, restart strategies, or
//! a generic typed `Actor<M>` trait — behaviors are pattern-matched values,
//! and recovery is left to however the application wires up links and
//! monitors.

pub mod actor;
pub mod atom;
pub mod group;
pub mod mailbox;
pub mod message;
pub mod monitoring;
pub mod pattern;
pub mod payload;
pub mod prelude;
pub mod scheduler;
pub mod sync;
pub mod system;
pub mod transport;
pub mod util;

pub use actor::{ActorContext, ActorFlavor, ActorRef, ExitReason};
pub use pattern::{MatchExpression, Pattern};
pub use payload::{Payload, PayloadValue};
pub use scheduler::{spawn, SpawnOptions};
pub use system::{RuntimeError, SystemConfig};
