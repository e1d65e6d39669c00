//! The actor's shared state, split from what only the executing worker owns.
//!
//! spec.md's invariant 1 ("exactly one scheduler worker processes a given
//! actor at a time") lets most of an actor's bookkeeping live behind a
//! plain `&mut` with no locking at all. [`ActorCell`] is the part that
//! genuinely needs concurrent access — other threads enqueue mail, link,
//! or monitor this actor — while [`ActorWorkerState`] is exclusively owned
//! by whichever worker is currently running the actor's handler.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

// Layer 2: Third-party crate imports
use dashmap::DashSet;
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::actor::exit::ExitReason;
use crate::actor::flavor::ActorFlavor;
use crate::actor::lifecycle::{ActorLifecycle, ActorState};
use crate::actor::reference::ActorRef;
use crate::mailbox::Mailbox;
use crate::pattern::MatchExpression;
use crate::sync::SyncRequestTable;
use crate::util::{ActorId, NodeId, RequestIdAllocator};

/// Shared, concurrently-accessed state for one local actor.
pub struct ActorCell {
    id: ActorId,
    node: NodeId,
    flavor: ActorFlavor,
    mailbox: Mailbox,
    links: DashSet<ActorRef>,
    monitors: DashSet<ActorRef>,
    exit_reason: OnceLock<ExitReason>,
    lifecycle: Mutex<ActorLifecycle>,
    /// Exclusion counter backing spec.md §8 property 2 (at-most-one
    /// executor); incremented on worker entry, decremented on exit.
    executing: AtomicU8,
}

impl ActorCell {
    pub fn new(id: ActorId, node: NodeId, flavor: ActorFlavor) -> Self {
        Self {
            id,
            node,
            flavor,
            mailbox: Mailbox::new(id),
            links: DashSet::new(),
            monitors: DashSet::new(),
            exit_reason: OnceLock::new(),
            lifecycle: Mutex::new(ActorLifecycle::new()),
            executing: AtomicU8::new(0),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn flavor(&self) -> ActorFlavor {
        self.flavor
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn links(&self) -> &DashSet<ActorRef> {
        &self.links
    }

    pub fn monitors(&self) -> &DashSet<ActorRef> {
        &self.monitors
    }

    pub fn state(&self) -> ActorState {
        self.lifecycle.lock().state()
    }

    pub fn transition_to(&self, state: ActorState) {
        self.lifecycle.lock().transition_to(state);
    }

    pub fn is_exited(&self) -> bool {
        self.exit_reason.get().is_some()
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit_reason.get().copied()
    }

    /// Set the terminal exit reason. Returns `false` if this actor had
    /// already exited (spec.md §8 property 3: exit-once).
    pub fn set_exit_reason(&self, reason: ExitReason) -> bool {
        let set = self.exit_reason.set(reason).is_ok();
        if set {
            self.transition_to(ActorState::Exited(reason));
            self.mailbox.close();
        }
        set
    }

    /// Marks the start of a quantum. Panics in debug builds if another
    /// worker is already executing this actor — the scenario spec.md §8
    /// property 2 exists to rule out.
    pub fn enter_execution(&self) -> ExecutionGuard<'_> {
        let previous = self.executing.fetch_add(1, Ordering::AcqRel);
        debug_assert_eq!(previous, 0, "actor entered by more than one worker at once");
        ExecutionGuard { cell: self }
    }
}

/// RAII guard marking exclusive execution of one quantum; released on drop.
pub struct ExecutionGuard<'a> {
    cell: &'a ActorCell,
}

impl Drop for ExecutionGuard<'_> {
    fn drop(&mut self) {
        self.cell.executing.fetch_sub(1, Ordering::AcqRel);
    }
}

/// State exclusively owned by the worker currently running this actor.
///
/// Never shared across threads; moved between quanta by the scheduler
/// alongside the actor's [`ActorRef`].
pub struct ActorWorkerState {
    pub current_behavior: MatchExpression,
    /// Messages no clause of `current_behavior` matched, held for replay
    /// against the next installed behavior (spec.md §4.1).
    pub skip_buffer: Vec<crate::message::Envelope>,
    /// Envelopes handed back from the most recent `become_behavior` call,
    /// drained one per quantum ahead of anything freshly dequeued from the
    /// mailbox (spec.md §4.1, §4.4).
    pub replay_queue: VecDeque<crate::message::Envelope>,
    pub pending_sync: SyncRequestTable,
    pub request_ids: RequestIdAllocator,
    /// Bumped by every [`Self::become_behavior`] call; lets the scheduler
    /// tell an armed `Timeout` timer apart from one left over from a
    /// behavior the actor has since replaced (spec.md §4.1, §5).
    pub behavior_epoch: u64,
    /// Whether a `Timeout` timer for `current_behavior` is currently
    /// sleeping out in the scheduler. Cleared when that timer fires or a
    /// new behavior is installed, so a stale timer from a superseded
    /// behavior declines to run its handler twice.
    pub timeout_armed: bool,
}

impl ActorWorkerState {
    pub fn new(initial_behavior: MatchExpression) -> Self {
        Self {
            current_behavior: initial_behavior,
            skip_buffer: Vec::new(),
            replay_queue: VecDeque::new(),
            pending_sync: SyncRequestTable::new(),
            request_ids: RequestIdAllocator::new(),
            behavior_epoch: 0,
            timeout_armed: false,
        }
    }

    /// Install a new behavior and return the skip buffer that must be
    /// replayed against it before any newly-dequeued message.
    pub fn become_behavior(&mut self, next: MatchExpression) -> Vec<crate::message::Envelope> {
        self.current_behavior = next;
        self.behavior_epoch += 1;
        self.timeout_armed = false;
        std::mem::take(&mut self.skip_buffer)
    }
}
