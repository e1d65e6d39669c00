//! Dedicated-thread actors (spec.md §4.4, `ActorFlavor::Blocking`).
//!
//! A blocking actor's `Initializer` is its entire body, not just a
//! behavior-installing prelude: it runs to completion on its own OS thread,
//! calling [`crate::actor::ActorContext::receive`] itself whenever it wants
//! the next message. There is no per-quantum handoff back to a worker pool —
//! the thread exits, with reason `Normal` unless the body called `quit`
//! itself, exactly when the body returns.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::{ActorCell, ActorContext, ActorWorkerState, Initializer};
use crate::pattern::MatchExpression;

use super::finalize_exit;

pub fn spawn(cell: Arc<ActorCell>, init: Initializer) {
    let id = cell.id();
    let spawned = std::thread::Builder::new()
        .name(format!("actor-{id}"))
        .spawn(move || run(cell, init));

    // Thread creation failing is an OS-resource problem this crate cannot
    // recover from locally; the actor simply never runs, and its monitors
    // never see it do anything either. `spawned` carries the error for a
    // caller that wants to log it, but nothing here currently does.
    drop(spawned);
}

fn run(cell: Arc<ActorCell>, init: Initializer) {
    let mut worker_state = ActorWorkerState::new(MatchExpression::empty());
    let _guard = cell.enter_execution();
    let outcome = {
        let mut ctx = ActorContext::for_init(Arc::clone(&cell), &mut worker_state);
        init(&mut ctx);
        ctx.finish()
    };
    drop(_guard);

    let reason = outcome
        .quit
        .unwrap_or(crate::actor::ExitReason::Normal);
    finalize_exit(&cell, reason);
}
