//! spec.md §8 invariant 7: messages skipped by a behavior that didn't
//! match them are replayed, in their original arrival order, against the
//! next behavior installed via `become_`.

#![allow(clippy::unwrap_used)]

use haven_actors::actor::{send, ActorCell, ActorContext, ActorFlavor, ActorRef, Initializer};
use haven_actors::atom::intern;
use haven_actors::pattern::MatchExpression;
use haven_actors::scheduler::{spawn, SpawnOptions};
use haven_actors::util::{ActorId, NodeId};
use haven_actors::{pattern_match, payload};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn test_sender() -> ActorRef {
    ActorRef::Local(Arc::new(ActorCell::new(
        ActorId::next(),
        NodeId::generate(),
        ActorFlavor::EventBased,
    )))
}

#[tokio::test]
async fn messages_skipped_before_unlock_replay_in_arrival_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&seen);

    let init: Initializer = Box::new(move |ctx: &mut ActorContext<'_>| {
        let captured = Arc::clone(&captured);
        ctx.become_(
            MatchExpression::builder()
                .case(
                    pattern_match![intern("unlock")],
                    Arc::new(move |ctx, _bindings| {
                        let captured = Arc::clone(&captured);
                        ctx.become_(
                            MatchExpression::builder()
                                .case(
                                    pattern_match![_],
                                    Arc::new(move |_ctx, bindings| {
                                        captured.lock().unwrap().push(bindings[0].as_int().unwrap());
                                    }),
                                )
                                .build(),
                        );
                    }),
                )
                .build(),
        );
    });
    let actor = spawn(ActorFlavor::EventBased, init, SpawnOptions::default());

    let sender = test_sender();
    send(sender.clone(), &actor, payload![1i64]);
    send(sender.clone(), &actor, payload![2i64]);
    send(sender.clone(), &actor, payload![intern("unlock")]);
    send(sender, &actor, payload![3i64]);

    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
}
