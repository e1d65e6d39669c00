//! `Mailbox` enqueue/dequeue benchmarks, isolated from the scheduler and
//! pattern matching so they measure the queue itself.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use haven_actors::actor::{ActorCell, ActorFlavor};
use haven_actors::mailbox::Mailbox;
use haven_actors::message::Envelope;
use haven_actors::payload;
use haven_actors::util::{ActorId, NodeId};

fn bare_ref() -> haven_actors::actor::ActorRef {
    haven_actors::actor::ActorRef::Local(Arc::new(ActorCell::new(
        ActorId::next(),
        NodeId::generate(),
        ActorFlavor::EventBased,
    )))
}

fn mailbox_enqueue_dequeue(c: &mut Criterion) {
    c.bench_function("mailbox_enqueue_dequeue", |b| {
        b.iter(|| {
            let mailbox = Mailbox::new(ActorId::next());
            let sender = bare_ref();
            let receiver = bare_ref();

            for i in 0..100i64 {
                mailbox.enqueue(Envelope::message(sender.clone(), receiver.clone(), payload![i]));
            }

            let mut drained = 0;
            while mailbox.dequeue().into_message().is_some() {
                drained += 1;
            }

            black_box(drained);
        });
    });
}

fn mailbox_interleaved_enqueue_dequeue(c: &mut Criterion) {
    c.bench_function("mailbox_interleaved_enqueue_dequeue", |b| {
        b.iter(|| {
            let mailbox = Mailbox::new(ActorId::next());
            let sender = bare_ref();
            let receiver = bare_ref();

            for i in 0..100i64 {
                mailbox.enqueue(Envelope::message(sender.clone(), receiver.clone(), payload![i]));
                black_box(mailbox.dequeue().into_message());
            }
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
        mailbox_enqueue_dequeue,
        mailbox_interleaved_enqueue_dequeue
}

criterion_main!(benches);
