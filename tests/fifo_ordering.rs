//! spec.md §8 invariant 1: per-sender FIFO delivery.

#![allow(clippy::unwrap_used)]

use haven_actors::actor::{send, ActorContext, ActorFlavor, ActorRef, Initializer};
use haven_actors::atom::intern;
use haven_actors::pattern::MatchExpression;
use haven_actors::scheduler::{spawn, SpawnOptions};
use haven_actors::{pattern_match, payload};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn collector() -> (Arc<Mutex<Vec<i64>>>, Initializer) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&seen);
    let init: Initializer = Box::new(move |ctx: &mut ActorContext<'_>| {
        let captured = Arc::clone(&captured);
        ctx.become_(
            MatchExpression::builder()
                .case(
                    pattern_match![intern("tick"), _],
                    Arc::new(move |_ctx, bindings| {
                        let value = bindings[1].as_int().unwrap();
                        captured.lock().unwrap().push(value);
                    }),
                )
                .build(),
        );
    });
    (seen, init)
}

#[tokio::test]
async fn messages_from_one_sender_arrive_in_send_order() {
    let (seen, init) = collector();
    let receiver = spawn(ActorFlavor::EventBased, init, SpawnOptions::default());

    let sender = ActorRef::Local(Arc::new(haven_actors::actor::ActorCell::new(
        haven_actors::util::ActorId::next(),
        haven_actors::util::NodeId::generate(),
        ActorFlavor::EventBased,
    )));

    for i in 0..50i64 {
        send(sender.clone(), &receiver, payload![intern("tick"), i]);
    }

    tokio::time::sleep(Duration::from_millis(200)).await;

    let collected = seen.lock().unwrap().clone();
    assert_eq!(collected, (0..50).collect::<Vec<_>>());
}

#[tokio::test]
async fn two_senders_each_see_their_own_fifo_order() {
    let (seen, init) = collector();
    let receiver = spawn(ActorFlavor::EventBased, init, SpawnOptions::default());

    let make_sender = || {
        ActorRef::Local(Arc::new(haven_actors::actor::ActorCell::new(
            haven_actors::util::ActorId::next(),
            haven_actors::util::NodeId::generate(),
            ActorFlavor::EventBased,
        )))
    };
    let sender_a = make_sender();
    let sender_b = make_sender();

    for i in 0..20i64 {
        send(sender_a.clone(), &receiver, payload![intern("tick"), i]);
        send(sender_b.clone(), &receiver, payload![intern("tick"), i + 1000]);
    }

    tokio::time::sleep(Duration::from_millis(200)).await;

    let collected = seen.lock().unwrap().clone();
    assert_eq!(collected.len(), 40);
    let from_a: Vec<i64> = collected.iter().copied().filter(|v| *v < 1000).collect();
    let from_b: Vec<i64> = collected.iter().copied().filter(|v| *v >= 1000).collect();
    assert_eq!(from_a, (0..20).collect::<Vec<_>>());
    assert_eq!(from_b, (1000..1020).collect::<Vec<_>>());
}
