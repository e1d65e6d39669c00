//! Running exactly one quantum of an event-based actor (spec.md §4.4).

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::context::DispatchOutcome;
use crate::actor::{ActorCell, ActorContext, ActorWorkerState};
use crate::mailbox::Dequeued;
use crate::message::Envelope;
use crate::pattern::{MatchExpression, MatchResult};

/// What happened when the scheduler tried to run one quantum for an actor.
pub enum QuantumResult {
    /// A message (fresh or replayed) was dispatched.
    Processed(DispatchOutcome),
    /// Neither the replay queue nor the mailbox had anything waiting.
    Idle,
}

/// Run at most one message through `worker`'s current behavior, honoring
/// the sync-response fast path of spec.md §4.5 step 4: a reply matching an
/// outstanding `sync_send` is dispatched against its own continuation
/// instead of the actor's general behavior.
pub fn run_quantum(cell: &Arc<ActorCell>, worker: &mut ActorWorkerState) -> QuantumResult {
    let envelope = match worker.replay_queue.pop_front() {
        Some(envelope) => envelope,
        None => match cell.mailbox().dequeue() {
            Dequeued::Message(envelope) => envelope,
            Dequeued::Empty => return QuantumResult::Idle,
        },
    };

    if envelope.is_pending_sync_candidate() {
        // `request_id` is `Some` by construction of `is_pending_sync_candidate`.
        if let Some(request_id) = envelope.request_id {
            if let Some(expression) = worker.pending_sync.take(request_id) {
                return QuantumResult::Processed(dispatch_against(cell, worker, envelope, &expression));
            }
        }
        // No continuation pending (already timed out, or a duplicate
        // response): the reply has nowhere to go.
        return QuantumResult::Processed(DispatchOutcome {
            replay: None,
            quit: None,
        });
    }

    let behavior = worker.current_behavior.clone();
    QuantumResult::Processed(dispatch_against(cell, worker, envelope, &behavior))
}

fn dispatch_against(
    cell: &Arc<ActorCell>,
    worker: &mut ActorWorkerState,
    envelope: Envelope,
    expression: &MatchExpression,
) -> DispatchOutcome {
    match expression.match_payload(&envelope.payload) {
        MatchResult::Matched { handler, bindings } => {
            let mut ctx = ActorContext::for_message(Arc::clone(cell), worker, envelope);
            handler(&mut ctx, &bindings);
            ctx.finish()
        }
        MatchResult::NoMatch => {
            crate::monitoring::sink::emit_actor(
                cell.id(),
                crate::monitoring::ActorEventKind::MessageSkipped {
                    message_type: message_type_of(&envelope.payload),
                },
            );
            worker.skip_buffer.push(envelope);
            DispatchOutcome {
                replay: None,
                quit: None,
            }
        }
    }
}

/// A human-readable stand-in for "message type" (spec.md doesn't give
/// untyped tuple payloads a type name): the payload's element type tags,
/// parenthesized, e.g. `(atom,int)`.
fn message_type_of(payload: &crate::payload::Payload) -> String {
    let tags: Vec<String> = payload.values().iter().map(|v| v.type_tag().to_string()).collect();
    format!("({})", tags.join(","))
}
