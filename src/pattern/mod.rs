//! Pattern-matched behaviors: the runtime-typed alternative to a closed
//! `Message` enum (spec.md §4.1, §9).
//!
//! A [`MatchExpression`] is a value an actor installs as its current
//! behavior. It owns an ordered list of clauses; the first clause whose
//! [`Pattern`] matches a [`Payload`](crate::payload::Payload) wins.

pub mod clause;
pub mod expression;
pub mod value_pattern;

pub use clause::{Clause, Handler};
pub use expression::{MatchExpression, MatchExpressionBuilder, MatchResult};
pub use value_pattern::Pattern;
