//! Supporting types for the mailbox's enqueue/dequeue contract.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::message::Envelope;

/// Result of [`super::Mailbox::enqueue`] (spec.md §4.2).
///
/// `was_empty` tells the caller whether this send transitioned the actor
/// from idle to runnable, so the scheduler knows whether to reschedule it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enqueued(bool);

impl Enqueued {
    pub fn new(was_empty: bool) -> Self {
        Self(was_empty)
    }

    pub fn was_empty(&self) -> bool {
        self.0
    }
}

/// Result of [`super::Mailbox::dequeue`].
#[derive(Debug)]
pub enum Dequeued {
    Message(Envelope),
    Empty,
}

impl Dequeued {
    pub fn into_message(self) -> Option<Envelope> {
        match self {
            Dequeued::Message(envelope) => Some(envelope),
            Dequeued::Empty => None,
        }
    }
}
