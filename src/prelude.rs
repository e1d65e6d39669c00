//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits for
//! building actors with haven-actors. Import this module to get started
//! quickly:
//!
//! ```rust
//! use haven_actors::prelude::*;
//! ```
//!
//! # What's Included
//!
//! ## Core Actor System
//! - [`ActorContext`] - the handle every pattern handler runs against
//! - [`ActorRef`] - an actor's address, local or remote
//! - [`ActorFlavor`] - event-based vs blocking scheduling
//! - [`ExitReason`] - why an actor terminated
//! - [`Initializer`] - the closure run once at spawn time
//! - [`send`] - send an ordinary message to an [`ActorRef`]
//!
//! ## Behaviors
//! - [`MatchExpression`] / [`MatchExpressionBuilder`] - the pattern-matched
//!   value an actor `become`s
//! - [`Pattern`] - one case's match criteria
//! - [`Clause`] / [`Handler`] / [`MatchResult`] - the pieces a behavior is
//!   built from
//! - [`pattern_match!`] - builds a [`Pattern`] from literal values
//!
//! ## Payloads and atoms
//! - [`Payload`] / [`PayloadValue`] / [`TypeTag`] - the untyped tuple values
//!   messages carry
//! - [`Atom`] / [`intern`] - interned symbolic tags
//! - [`payload!`] - builds a [`Payload`] from literal values
//!
//! ## Mailbox and messages
//! - [`Mailbox`] - the per-actor message queue
//! - [`Dequeued`] / [`Enqueued`] - the outcomes of mailbox operations
//! - [`Envelope`] - a message in transit between actors
//!
//! ## Synchronous requests
//! - [`RequestHandle`] - the fluent builder returned by
//!   [`ActorContext::sync_send`]
//!
//! ## Groups
//! - [`group`] - named, process-wide pub/sub groups
//! - [`GroupHandle`] - a handle to one named group
//!
//! ## Transport
//! - [`transport`] - publish an actor for remote access, or connect to one
//! - [`ProxyActor`] - a remote actor's local stand-in
//! - [`TransportError`] - errors from publishing or connecting
//!
//! ## Scheduling
//! - [`spawn`] / [`spawn_linked`] - start a new actor
//! - [`SpawnOptions`] - spawn-time monitor/link wiring
//!
//! ## Monitoring
//! - [`Monitor`] - the trait every observability sink implements
//! - [`MonitoringEvent`] - the trait every structured event implements
//! - [`EventSeverity`] - event severity levels
//!
//! ## System
//! - [`SystemConfig`] - process-wide runtime configuration
//! - [`RuntimeError`] - errors from bootstrap/shutdown
//!
//! ## Utilities
//! - [`ActorId`] / [`GlobalActorId`] / [`NodeId`] / [`RequestId`] - ids
//!   shared across the crate
//!
//! # Example
//!
//! ```rust,no_run
//! use haven_actors::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let greeter = spawn(
//!     ActorFlavor::EventBased,
//!     Box::new(|ctx: &mut ActorContext<'_>| {
//!         ctx.become_(
//!             MatchExpression::builder()
//!                 .case(
//!                     pattern_match![intern("greet")],
//!                     Arc::new(|ctx: &mut ActorContext<'_>, _bindings| {
//!                         ctx.reply(intern("hello"));
//!                     }),
//!                 )
//!                 .build(),
//!         );
//!     }),
//!     SpawnOptions::default(),
//! );
//! send(greeter.clone(), &greeter, payload![intern("greet")]);
//! # }
//! ```

// Core actor system
pub use crate::actor::{send, ActorContext, ActorFlavor, ActorRef, ExitReason, Initializer};

// Behaviors
pub use crate::pattern::{Clause, Handler, MatchExpression, MatchExpressionBuilder, MatchResult, Pattern};

// Payloads and atoms
pub use crate::atom::{intern, Atom};
pub use crate::payload::{Payload, PayloadValue, TypeTag};

// Mailbox and messages
pub use crate::mailbox::{Dequeued, Enqueued, Mailbox};
pub use crate::message::Envelope;

// Synchronous requests
pub use crate::sync::RequestHandle;

// Groups
pub use crate::group::{self, GroupHandle};

// Transport
pub use crate::transport::{self, ProxyActor, TransportError};

// Scheduling
pub use crate::scheduler::{spawn, spawn_linked, SpawnOptions};

// Monitoring
pub use crate::monitoring::{EventSeverity, Monitor, MonitoringEvent};

// System
pub use crate::system::{RuntimeError, SystemConfig};

// Utilities
pub use crate::util::{ActorId, GlobalActorId, NodeId, RequestId};

// Macros
pub use crate::{pattern_match, payload};
