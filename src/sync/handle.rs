//! The fluent handle returned by `sync_send`.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::cell::ActorWorkerState;
use crate::pattern::{Handler, MatchExpressionBuilder, Pattern};
use crate::util::{ActorId, RequestId};

/// Accumulates the continuation for one outstanding `sync_send`, then
/// installs it into the issuing actor's [`crate::sync::SyncRequestTable`]
/// once the caller is done chaining `.then(...)` / `.after(...)`.
///
/// Installation happens on [`Drop`] rather than requiring an explicit
/// terminal call, so `sync_send(...).then(...)` reads the way spec.md §4.5
/// describes it without an awkward trailing `.install()`.
pub struct RequestHandle<'a> {
    request_id: RequestId,
    actor_id: ActorId,
    worker: &'a mut ActorWorkerState,
    builder: Option<MatchExpressionBuilder>,
}

impl<'a> RequestHandle<'a> {
    pub fn new(request_id: RequestId, actor_id: ActorId, worker: &'a mut ActorWorkerState) -> Self {
        Self {
            request_id,
            actor_id,
            worker,
            builder: Some(MatchExpressionBuilder::new()),
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Add a pattern this sync response may match against.
    #[must_use]
    pub fn then(mut self, pattern: Pattern, handler: Handler) -> Self {
        self.builder = self.builder.take().map(|b| b.case(pattern, handler));
        self
    }

    /// Add the timeout clause fired if no response matches `handle_response`
    /// (via `then`) before `duration` elapses (spec.md §4.5 step 5).
    #[must_use]
    pub fn after(mut self, duration: Duration, handler: Handler) -> Self {
        self.builder = self.builder.take().map(|b| b.after(duration, handler));
        self
    }

    fn install(&mut self) {
        if let Some(builder) = self.builder.take() {
            let expression = builder.build();
            // The continuation's own `Timeout` clause (spec.md §4.5 step 5)
            // needs an active timer driving it, since nothing else ever
            // re-visits `pending_sync` — arm one alongside installing the
            // continuation itself.
            if let Some(duration) = expression.timeout() {
                crate::scheduler::schedule_sync_timeout(self.actor_id, self.request_id, duration);
            }
            self.worker.pending_sync.insert(self.request_id, expression);
        }
    }
}

impl Drop for RequestHandle<'_> {
    fn drop(&mut self) {
        self.install();
    }
}
