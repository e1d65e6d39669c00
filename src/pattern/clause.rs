//! One arm of a [`super::MatchExpression`].

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::context::ActorContext;
use crate::pattern::value_pattern::Pattern;
use crate::payload::PayloadValue;

/// Body run when a clause's pattern matches, or when a `Timeout` clause's
/// deadline elapses.
///
/// A plain function pointer would do for stateless actors, but real
/// handlers close over actor-local state — hence `Arc<dyn Fn>` rather than
/// `fn(...)`, mirroring how the source's deeply-inherited actor classes
/// closed over `this` (spec.md §9).
pub type Handler = Arc<dyn for<'ctx> Fn(&mut ActorContext<'ctx>, &[PayloadValue]) + Send + Sync>;

/// Either a `(Pattern, Handler)` arm, or the single `Timeout(duration,
/// Handler)` clause a [`super::MatchExpression`] may carry.
#[derive(Clone)]
pub enum Clause {
    Case(Pattern, Handler),
    Timeout(Duration, Handler),
}

impl Clause {
    pub fn case(pattern: Pattern, handler: Handler) -> Self {
        Clause::Case(pattern, handler)
    }

    pub fn timeout(after: Duration, handler: Handler) -> Self {
        Clause::Timeout(after, handler)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Clause::Timeout(..))
    }
}
