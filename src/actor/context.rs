//! The `&mut ActorContext` every pattern handler runs against (spec.md §6).
//!
//! One context is built fresh for each quantum: either an actor's
//! initializer call or a single dequeued/replayed message. It borrows the
//! worker-exclusive [`ActorWorkerState`] for the duration of that quantum and
//! is discarded afterwards — `become_`, `quit`, and `sync_send` all record
//! their effect either directly on the worker state or on this context, for
//! the scheduler to read back once the handler returns.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::cell::{ActorCell, ActorWorkerState};
use crate::actor::exit::ExitReason;
use crate::actor::flavor::ActorFlavor;
use crate::actor::reference::{self, ActorRef};
use crate::mailbox::Dequeued;
use crate::message::Envelope;
use crate::payload::{Payload, PayloadValue};
use crate::pattern::{MatchExpression, MatchResult};
use crate::scheduler::{self, SpawnOptions};
use crate::sync::RequestHandle;
use crate::util::NodeId;

/// Closure run once, at spawn time, to install an actor's first behavior.
///
/// Mirrors the pattern every handler follows: rather than returning a
/// [`MatchExpression`], the initializer calls [`ActorContext::become_`]
/// itself, exactly like any other behavior change.
pub type Initializer = Box<dyn FnOnce(&mut ActorContext<'_>) + Send + 'static>;

/// Everything the scheduler needs to know about a finished quantum that
/// can't simply be left mutated on the worker state.
pub struct DispatchOutcome {
    pub replay: Option<Vec<Envelope>>,
    pub quit: Option<ExitReason>,
}

pub struct ActorContext<'w> {
    cell: Arc<ActorCell>,
    worker: &'w mut ActorWorkerState,
    current: Option<Envelope>,
    taken: bool,
    replay: Option<Vec<Envelope>>,
    quit: Option<ExitReason>,
}

impl<'w> ActorContext<'w> {
    /// Build a context for an initializer call: no message has been
    /// dequeued yet.
    pub fn for_init(cell: Arc<ActorCell>, worker: &'w mut ActorWorkerState) -> Self {
        Self {
            cell,
            worker,
            current: None,
            taken: false,
            replay: None,
            quit: None,
        }
    }

    /// Build a context for firing a `Timeout` clause (either a behavior's
    /// own, or a `sync_send` continuation's): no message has been dequeued,
    /// exactly like [`Self::for_init`].
    pub fn for_timeout(cell: Arc<ActorCell>, worker: &'w mut ActorWorkerState) -> Self {
        Self::for_init(cell, worker)
    }

    /// Build a context for dispatching one dequeued or replayed envelope.
    pub fn for_message(
        cell: Arc<ActorCell>,
        worker: &'w mut ActorWorkerState,
        envelope: Envelope,
    ) -> Self {
        Self {
            cell,
            worker,
            current: Some(envelope),
            taken: false,
            replay: None,
            quit: None,
        }
    }

    /// Consume the context once the handler has returned, surfacing
    /// anything the scheduler must act on.
    pub fn finish(self) -> DispatchOutcome {
        DispatchOutcome {
            replay: self.replay,
            quit: self.quit,
        }
    }

    pub fn worker_mut(&mut self) -> &mut ActorWorkerState {
        self.worker
    }

    /// A reference to the actor running this handler.
    pub fn self_ref(&self) -> ActorRef {
        ActorRef::Local(Arc::clone(&self.cell))
    }

    /// Alias for [`Self::self_ref`] matching spec.md §6's `self`.
    pub fn this(&self) -> ActorRef {
        self.self_ref()
    }

    pub fn node(&self) -> NodeId {
        self.cell.node()
    }

    pub fn flavor(&self) -> ActorFlavor {
        self.cell.flavor()
    }

    /// The sender of the message currently being handled, if any.
    pub fn last_sender(&self) -> Option<ActorRef> {
        self.current.as_ref().map(|e| e.sender.clone())
    }

    /// The payload of the message currently being handled, if any.
    pub fn last_dequeued(&self) -> Option<&Payload> {
        self.current.as_ref().map(|e| &e.payload)
    }

    /// Install a new behavior, replaying whatever the previous behavior
    /// skipped (spec.md §4.1, §4.4).
    pub fn become_(&mut self, expression: MatchExpression) {
        let replayed = self.worker.become_behavior(expression);
        self.replay = Some(replayed);
        crate::monitoring::sink::emit_actor(
            self.cell.id(),
            crate::monitoring::ActorEventKind::BehaviorReplaced,
        );
    }

    /// Send an ordinary (non-sync) message to `target`.
    pub fn send(&self, target: &ActorRef, payload: Payload) {
        reference::send(self.self_ref(), target, payload);
    }

    /// Start a `sync_send` round trip: enqueue the request and return a
    /// builder for the continuation that matches its response (spec.md
    /// §4.5).
    pub fn sync_send(&mut self, target: &ActorRef, payload: Payload) -> RequestHandle<'_> {
        let request_id = self.worker.request_ids.allocate();
        let envelope = Envelope::sync_request(self.self_ref(), target.clone(), payload, request_id);
        target.enqueue_foreign(envelope);
        crate::monitoring::sink::emit_sync(
            self.cell.id(),
            crate::monitoring::SyncEventKind::Sent {
                request_id: request_id.as_raw(),
            },
        );
        RequestHandle::new(request_id, self.cell.id(), self.worker)
    }

    /// Reply to the sync request currently being handled with a single
    /// value, wrapped as a one-element tuple.
    pub fn reply(&mut self, value: impl Into<PayloadValue>) {
        self.reply_tuple(Payload::new(vec![value.into()]));
    }

    /// Reply to the sync request currently being handled with a full
    /// payload tuple.
    pub fn reply_tuple(&mut self, payload: Payload) {
        let Some(envelope) = self.current.as_ref() else {
            return;
        };
        let Some(request_id) = envelope.request_id else {
            return;
        };
        if envelope.is_sync_response {
            // A reply to a reply has nowhere sensible to go.
            return;
        }
        let response = Envelope::sync_response(
            self.self_ref(),
            envelope.sender.clone(),
            payload,
            request_id,
        );
        envelope.sender.enqueue_foreign(response);
        self.taken = true;
        crate::monitoring::sink::emit_sync(
            self.cell.id(),
            crate::monitoring::SyncEventKind::Replied {
                request_id: request_id.as_raw(),
            },
        );
    }

    /// Hand the sync request currently being handled off to `other`,
    /// preserving the original requester so `other`'s eventual `reply`
    /// still satisfies the caller's pending continuation (spec.md §4.5,
    /// scenario S2).
    pub fn forward_to(&mut self, other: &ActorRef) {
        let Some(envelope) = self.current.take() else {
            return;
        };
        let Some(request_id) = envelope.request_id else {
            return;
        };
        let forwarded = Envelope::sync_request(envelope.sender, other.clone(), envelope.payload, request_id);
        other.enqueue_foreign(forwarded);
        self.taken = true;
        crate::monitoring::sink::emit_sync(
            self.cell.id(),
            crate::monitoring::SyncEventKind::Forwarded {
                request_id: request_id.as_raw(),
            },
        );
    }

    /// Run `f` against this context immediately. Lets a handler chain a
    /// follow-up step (e.g. issuing another `sync_send`) without leaving
    /// the current quantum, while still reading as a distinct step.
    pub fn continue_with(&mut self, f: impl FnOnce(&mut ActorContext<'_>)) {
        f(self);
    }

    /// Terminate this actor with `reason` once the current handler
    /// returns (spec.md §4.3).
    pub fn quit(&mut self, reason: ExitReason) {
        self.quit = Some(reason);
    }

    /// Register `observer` to receive a `DOWN` message when this actor
    /// exits.
    pub fn monitor(&self, observer: &ActorRef) {
        self.self_ref().add_monitor(observer.clone());
    }

    pub fn demonitor(&self, observer: &ActorRef) {
        self.self_ref().remove_monitor(observer);
    }

    /// Link this actor bidirectionally with `peer`.
    pub fn link(&self, peer: &ActorRef) {
        let me = self.self_ref();
        me.add_link(peer.clone());
        peer.add_link(me);
    }

    pub fn unlink(&self, peer: &ActorRef) {
        let me = self.self_ref();
        me.remove_link(peer);
        peer.remove_link(&me);
    }

    /// Spawn a new actor, auto-wiring it to `self` per `opts.monitored`/
    /// `opts.linked` (spec.md §4.4).
    pub fn spawn(
        &self,
        flavor: ActorFlavor,
        init: crate::actor::context::Initializer,
        opts: SpawnOptions,
    ) -> ActorRef {
        scheduler::spawn_linked(flavor, init, opts, Some(self.self_ref()))
    }

    pub fn taken(&self) -> bool {
        self.taken
    }

    /// Block the current (necessarily [`ActorFlavor::Blocking`]) actor's
    /// dedicated thread until `expression` matches a message or its
    /// `Timeout` clause elapses (spec.md §6).
    ///
    /// Unlike [`Self::become_`], this does not install `expression` as the
    /// actor's lasting behavior — it is consulted once, inline, for the
    /// actor's own Rust control flow to call again as often as it likes.
    /// Messages `expression` does not match are pushed to the skip buffer
    /// exactly as a mismatched `become_` behavior would, so a later
    /// `receive`/`become_` call still replays them.
    pub fn receive(&mut self, expression: &MatchExpression) {
        let deadline = expression.timeout().map(|d| std::time::Instant::now() + d);
        loop {
            let next = self.worker.replay_queue.pop_front().or_else(|| {
                match self.cell.mailbox().dequeue() {
                    Dequeued::Message(envelope) => Some(envelope),
                    Dequeued::Empty => None,
                }
            });

            if let Some(envelope) = next {
                match expression.match_payload(&envelope.payload) {
                    MatchResult::Matched { handler, bindings } => {
                        let previous = self.current.replace(envelope);
                        handler(self, &bindings);
                        self.current = previous;
                        return;
                    }
                    MatchResult::NoMatch => {
                        let tags: Vec<String> = envelope
                            .payload
                            .values()
                            .iter()
                            .map(|v| v.type_tag().to_string())
                            .collect();
                        crate::monitoring::sink::emit_actor(
                            self.cell.id(),
                            crate::monitoring::ActorEventKind::MessageSkipped {
                                message_type: format!("({})", tags.join(",")),
                            },
                        );
                        self.worker.skip_buffer.push(envelope);
                        continue;
                    }
                }
            }

            if let Some(deadline) = deadline {
                if std::time::Instant::now() >= deadline {
                    if let Some(handler) = expression.timeout_handler() {
                        handler(self, &[]);
                    }
                    return;
                }
            }
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
    }
}
