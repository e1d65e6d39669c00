//! Heterogeneous, typed, immutable message bodies.
//!
//! A [`Payload`] is an ordered tuple of [`PayloadValue`]s drawn from a
//! closed set of primitives plus an open registry of user types
//! (spec.md §3, §9). Payloads never mutate after construction: sending one
//! hands ownership to the mailbox, and matching only ever borrows it.

pub mod registry;
pub mod value;

pub use registry::{announce, PayloadCodec, UserPayload};
pub use value::{Payload, PayloadValue, TypeTag};
