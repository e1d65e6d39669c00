//! The per-actor `request_id -> continuation` map.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::time::Instant;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::pattern::{Handler, MatchExpression};
use crate::util::RequestId;

/// One outstanding `sync_send` continuation.
pub struct PendingSync {
    pub expression: MatchExpression,
    pub deadline: Option<Instant>,
}

/// Owned exclusively by the actor's [`crate::actor::cell::ActorWorkerState`]
/// — no locking needed, since only that actor's own handler ever reads or
/// writes it (spec.md §3, invariant 1).
#[derive(Default)]
pub struct SyncRequestTable {
    pending: HashMap<RequestId, PendingSync>,
}

impl SyncRequestTable {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Install `expression` as the continuation for `request_id`. The
    /// deadline, if any, comes from the expression's own `Timeout` clause.
    pub fn insert(&mut self, request_id: RequestId, expression: MatchExpression) {
        let deadline = expression.timeout().map(|d| Instant::now() + d);
        self.pending.insert(
            request_id,
            PendingSync {
                expression,
                deadline,
            },
        );
    }

    pub fn contains(&self, request_id: RequestId) -> bool {
        self.pending.contains_key(&request_id)
    }

    /// Consume and return the continuation for `request_id`, if one is
    /// still pending. A response that arrives after the entry has already
    /// been removed (by this or by [`Self::expire_overdue`]) is dropped by
    /// the caller (spec.md §4.5 step 6).
    pub fn take(&mut self, request_id: RequestId) -> Option<MatchExpression> {
        self.pending.remove(&request_id).map(|p| p.expression)
    }

    /// Remove every entry whose deadline has elapsed, returning their
    /// timeout handlers so the caller can run them.
    pub fn expire_overdue(&mut self, now: Instant) -> Vec<Handler> {
        let overdue: Vec<RequestId> = self
            .pending
            .iter()
            .filter_map(|(id, pending)| match pending.deadline {
                Some(deadline) if deadline <= now => Some(*id),
                _ => None,
            })
            .collect();

        overdue
            .into_iter()
            .filter_map(|id| self.pending.remove(&id))
            .filter_map(|pending| pending.expression.timeout_handler())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
