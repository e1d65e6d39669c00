//! An ordered list of clauses: the current behavior of an actor.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::pattern::clause::{Clause, Handler};
use crate::pattern::value_pattern::Pattern;
use crate::payload::{Payload, PayloadValue};

/// Outcome of matching a payload against a [`MatchExpression`] (spec.md
/// §4.1).
pub enum MatchResult {
    Matched {
        handler: Handler,
        bindings: Vec<PayloadValue>,
    },
    NoMatch,
}

/// An ordered sequence of clauses; the first whose pattern matches wins.
///
/// Constructed once via [`MatchExpressionBuilder`] and then treated as an
/// immutable value — `become` replaces the whole expression, it never
/// mutates one in place (spec.md §9, "Behaviors as first-class values").
#[derive(Clone)]
pub struct MatchExpression {
    clauses: Vec<Clause>,
    timeout: Option<(Duration, Handler)>,
}

impl MatchExpression {
    /// A behavior with no clauses at all; every message is skipped.
    pub fn empty() -> Self {
        Self {
            clauses: Vec::new(),
            timeout: None,
        }
    }

    pub fn builder() -> MatchExpressionBuilder {
        MatchExpressionBuilder::new()
    }

    /// The matcher does not mutate `payload`; it only borrows it for the
    /// duration of the call (spec.md §4.1).
    pub fn match_payload(&self, payload: &Payload) -> MatchResult {
        for clause in &self.clauses {
            if let Clause::Case(pattern, handler) = clause {
                if let Some(bindings) = pattern.try_match(payload) {
                    return MatchResult::Matched {
                        handler: handler.clone(),
                        bindings,
                    };
                }
            }
        }
        MatchResult::NoMatch
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.as_ref().map(|(duration, _)| *duration)
    }

    pub fn timeout_handler(&self) -> Option<Handler> {
        self.timeout.as_ref().map(|(_, handler)| handler.clone())
    }

    pub fn has_timeout(&self) -> bool {
        self.timeout.is_some()
    }
}

/// Builds a [`MatchExpression`], rejecting more than one `Timeout` clause
/// at construction time (spec.md §4.1).
#[derive(Default)]
pub struct MatchExpressionBuilder {
    clauses: Vec<Clause>,
    timeout: Option<(Duration, Handler)>,
}

impl MatchExpressionBuilder {
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
            timeout: None,
        }
    }

    pub fn case(mut self, pattern: Pattern, handler: Handler) -> Self {
        self.clauses.push(Clause::case(pattern, handler));
        self
    }

    /// Sets the single timeout clause. Panics if called twice — at most
    /// one `Timeout` clause is permitted per expression (spec.md §4.1).
    pub fn after(mut self, duration: Duration, handler: Handler) -> Self {
        assert!(
            self.timeout.is_none(),
            "a MatchExpression may declare at most one Timeout clause"
        );
        self.timeout = Some((duration, handler));
        self
    }

    pub fn build(self) -> MatchExpression {
        MatchExpression {
            clauses: self.clauses,
            timeout: self.timeout,
        }
    }
}
