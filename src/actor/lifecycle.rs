//! The actor state machine (spec.md §4.3).

// Layer 1: Standard library imports
use std::time::Instant;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};

// Layer 3: Internal module imports
use crate::actor::exit::ExitReason;

/// Where an actor sits in its run loop.
///
/// ```text
/// Runnable --worker picks up--> Running
/// Running  --mailbox empty, no timeout--> Waiting
/// Running  --mailbox empty, timeout set--> TimedWait(deadline)
/// Waiting / TimedWait --enqueue--> Runnable
/// TimedWait --deadline elapses--> Runnable (timeout handler fires)
/// Running  --quit() / unhandled panic--> Exited(reason)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActorState {
    /// Has work to do; waiting for a scheduler worker.
    Runnable,
    /// A worker is currently executing this actor's handler.
    Running,
    /// Mailbox empty, current behavior declares no timeout.
    Waiting,
    /// Mailbox empty, current behavior's `after(...)` deadline is pending.
    TimedWait(Instant),
    /// Terminal: no further messages are dequeued (spec.md §3, invariant 2).
    Exited(ExitReason),
}

impl ActorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActorState::Exited(_))
    }

    pub fn is_runnable(&self) -> bool {
        matches!(self, ActorState::Runnable)
    }
}

/// Tracks state transitions and timing for one actor.
///
/// `last_state_change` is kept as a `chrono::DateTime<Utc>` for anything a
/// monitor or log line will want to display, while the `TimedWait`
/// deadline itself is a monotonic [`Instant`] — wall-clock time is for
/// humans, `Instant` is for the scheduler's comparisons.
#[derive(Debug, Clone)]
pub struct ActorLifecycle {
    state: ActorState,
    last_state_change: DateTime<Utc>,
}

impl ActorLifecycle {
    pub fn new() -> Self {
        Self {
            state: ActorState::Runnable,
            last_state_change: Utc::now(),
        }
    }

    pub fn transition_to(&mut self, new_state: ActorState) {
        self.state = new_state;
        self.last_state_change = Utc::now();
    }

    pub fn state(&self) -> ActorState {
        self.state
    }

    pub fn last_state_change(&self) -> DateTime<Utc> {
        self.last_state_change
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

impl Default for ActorLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
