//! Message dispatch benchmarks:
//! - point-to-point send/receive latency
//! - sustained throughput to one actor
//! - fan-out to 10 actors

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use haven_actors::actor::{send, ActorCell, ActorContext, ActorFlavor, ActorRef, Initializer};
use haven_actors::pattern::Pattern;
use haven_actors::pattern::MatchExpression;
use haven_actors::payload;
use haven_actors::scheduler::{spawn, SpawnOptions};
use haven_actors::util::{ActorId, NodeId};

fn test_sender() -> ActorRef {
    ActorRef::Local(Arc::new(ActorCell::new(
        ActorId::next(),
        NodeId::generate(),
        ActorFlavor::EventBased,
    )))
}

fn counting_actor() -> (Arc<AtomicUsize>, ActorRef) {
    let count = Arc::new(AtomicUsize::new(0));
    let captured = Arc::clone(&count);
    let init: Initializer = Box::new(move |ctx: &mut ActorContext<'_>| {
        let captured = Arc::clone(&captured);
        ctx.become_(
            MatchExpression::builder()
                .case(
                    Pattern::any(0),
                    Arc::new(move |_ctx, _bindings| {
                        captured.fetch_add(1, Ordering::Relaxed);
                    }),
                )
                .build(),
        );
    });
    (count, spawn(ActorFlavor::EventBased, init, SpawnOptions::default()))
}

fn message_send_receive(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("message_send_receive", |b| {
        b.to_async(&rt).iter(|| async {
            let (count, actor) = counting_actor();
            send(test_sender(), &actor, payload![]);
            while count.load(Ordering::Acquire) == 0 {
                tokio::task::yield_now().await;
            }
            black_box(actor);
        });
    });
}

fn message_throughput(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("message_throughput", |b| {
        b.to_async(&rt).iter(|| async {
            let (count, actor) = counting_actor();
            let sender = test_sender();
            for _ in 0..100 {
                send(sender.clone(), &actor, payload![]);
            }
            while count.load(Ordering::Acquire) < 100 {
                tokio::task::yield_now().await;
            }
            black_box(actor);
        });
    });
}

fn message_broadcast_small(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("message_broadcast_small", |b| {
        b.to_async(&rt).iter(|| async {
            let mut counters = Vec::with_capacity(10);
            let mut actors = Vec::with_capacity(10);
            for _ in 0..10 {
                let (count, actor) = counting_actor();
                counters.push(count);
                actors.push(actor);
            }

            let sender = test_sender();
            for actor in &actors {
                send(sender.clone(), actor, payload![]);
            }

            for count in &counters {
                while count.load(Ordering::Acquire) == 0 {
                    tokio::task::yield_now().await;
                }
            }
            black_box(actors);
        });
    });
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
        .without_plots()
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets =
        message_send_receive,
        message_throughput,
        message_broadcast_small
}

criterion_main!(benches);
