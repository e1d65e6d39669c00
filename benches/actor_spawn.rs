//! Actor lifecycle benchmarks:
//! - single-actor spawn latency
//! - batch spawn (10 actors)
//! - spawn-with-link/monitor wiring overhead

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use haven_actors::actor::{ActorContext, ActorFlavor, Initializer};
use haven_actors::pattern::MatchExpression;
use haven_actors::scheduler::{spawn, spawn_linked, SpawnOptions};

fn noop_initializer() -> Initializer {
    Box::new(|ctx: &mut ActorContext<'_>| {
        ctx.become_(MatchExpression::empty());
    })
}

fn actor_spawn_single(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("actor_spawn_single", |b| {
        b.to_async(&rt).iter(|| async {
            let actor = spawn(ActorFlavor::EventBased, noop_initializer(), SpawnOptions::default());
            black_box(actor);
        });
    });
}

fn actor_spawn_batch_small(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("actor_spawn_batch_small", |b| {
        b.to_async(&rt).iter(|| async {
            let mut actors = Vec::with_capacity(10);
            for _ in 0..10 {
                actors.push(spawn(ActorFlavor::EventBased, noop_initializer(), SpawnOptions::default()));
            }
            black_box(actors);
        });
    });
}

fn actor_spawn_monitored_and_linked(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("actor_spawn_monitored_and_linked", |b| {
        b.to_async(&rt).iter(|| async {
            let parent = spawn(ActorFlavor::EventBased, noop_initializer(), SpawnOptions::default());
            let opts = SpawnOptions {
                monitored: true,
                linked: true,
                ..SpawnOptions::default()
            };
            let actor = spawn_linked(ActorFlavor::EventBased, noop_initializer(), opts, Some(parent.clone()));
            black_box((parent, actor));
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
        actor_spawn_single,
        actor_spawn_batch_small,
        actor_spawn_monitored_and_linked
}

criterion_main!(benches);
