//! A per-actor MPSC queue of [`Envelope`]s (spec.md §4.2).
//!
//! Producers are any thread holding an [`crate::actor::ActorRef`] to this
//! actor; the sole consumer is the scheduler worker currently executing
//! it. `enqueue` never blocks. `dequeue` is only ever correct to call from
//! that one worker — nothing here enforces that beyond the scheduler's own
//! bookkeeping (spec.md §3, invariant 1).

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::sync::{mpsc, Notify};

// Layer 3: Internal module imports
use super::traits::{Dequeued, Enqueued};
use crate::actor::exit::ExitReason;
use crate::actor::ActorRef;
use crate::atom::intern;
use crate::message::Envelope;
use crate::payload;
use crate::util::ActorId;

pub struct Mailbox {
    owner: ActorId,
    sender: mpsc::UnboundedSender<Envelope>,
    receiver: Mutex<mpsc::UnboundedReceiver<Envelope>>,
    pending: AtomicUsize,
    closed: AtomicBool,
    /// Lets an async scheduler worker await new mail instead of polling
    /// `dequeue` in a spin loop.
    notify: Notify,
}

impl Mailbox {
    pub fn new(owner: ActorId) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            owner,
            sender,
            receiver: Mutex::new(receiver),
            pending: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Resolves once new mail may be available. Spurious wakeups are
    /// possible; callers should re-check `dequeue` in a loop.
    pub async fn notified(&self) {
        self.notify.notified().await;
    }

    /// Enqueue `msg`, or — if this mailbox has been [`Mailbox::close`]d —
    /// drop it and synthesize an error response for any pending sync
    /// request it carried.
    pub fn enqueue(&self, msg: Envelope) -> Enqueued {
        if self.closed.load(Ordering::Acquire) {
            self.bounce(msg);
            return Enqueued::new(false);
        }

        let was_empty = self.pending.fetch_add(1, Ordering::AcqRel) == 0;
        if self.sender.send(msg).is_err() {
            // Receiver half was dropped without a matching `close()`; treat
            // it the same as closed.
            self.pending.fetch_sub(1, Ordering::AcqRel);
            return Enqueued::new(false);
        }
        self.notify.notify_one();
        Enqueued::new(was_empty)
    }

    /// Only ever called by the scheduler worker currently owning this
    /// actor.
    pub fn dequeue(&self) -> Dequeued {
        let mut receiver = self.receiver.lock();
        match receiver.try_recv() {
            Ok(msg) => {
                self.pending.fetch_sub(1, Ordering::AcqRel);
                Dequeued::Message(msg)
            }
            Err(_) => Dequeued::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.load(Ordering::Acquire) == 0
    }

    pub fn len(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Mark this mailbox closed: further `enqueue` calls are bounced
    /// instead of delivered (spec.md §4.2).
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        crate::monitoring::sink::emit_mailbox(self.owner, crate::monitoring::MailboxEventKind::Closed);
    }

    fn bounce(&self, msg: Envelope) {
        crate::monitoring::sink::emit_mailbox(
            self.owner,
            crate::monitoring::MailboxEventKind::MessageBounced {
                reason: "mailbox closed".to_owned(),
            },
        );
        if let (Some(request_id), false) = (msg.request_id, msg.is_sync_response) {
            let reply = Envelope::sync_response(
                msg.receiver.clone(),
                msg.sender.clone(),
                payload![intern(ExitReason::NoSuchActor.to_string().as_str())],
                request_id,
            );
            msg.sender.enqueue_foreign(reply);
        }
    }
}
