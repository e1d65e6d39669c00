//! The one concrete message shape every actor's mailbox carries.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::ActorRef;
use crate::payload::Payload;
use crate::util::RequestId;

/// A message in flight between two actors (spec.md §3).
///
/// Unlike the generic `MessageEnvelope<M>` this replaces, every message in
/// this runtime has the same shape: a [`Payload`] tuple plus routing and
/// sync-request metadata. Type-level distinctions between "kinds" of
/// message are expressed by matching on the payload's contents, not by the
/// Rust type of the envelope.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub sender: ActorRef,
    pub receiver: ActorRef,
    pub payload: Payload,
    /// Set when this message is part of a `sync_send` round trip: either
    /// the original request (carrying the allocated id) or the reply to
    /// one (see `is_sync_response`).
    pub request_id: Option<RequestId>,
    /// True when this envelope is a `reply(...)` to a pending sync
    /// request rather than an ordinary message or a fresh sync request.
    pub is_sync_response: bool,
}

impl Envelope {
    /// An ordinary, non-sync message.
    pub fn message(sender: ActorRef, receiver: ActorRef, payload: Payload) -> Self {
        Self {
            sender,
            receiver,
            payload,
            request_id: None,
            is_sync_response: false,
        }
    }

    /// The initial request of a `sync_send`.
    pub fn sync_request(
        sender: ActorRef,
        receiver: ActorRef,
        payload: Payload,
        request_id: RequestId,
    ) -> Self {
        Self {
            sender,
            receiver,
            payload,
            request_id: Some(request_id),
            is_sync_response: false,
        }
    }

    /// A `reply(...)` to a pending sync request.
    pub fn sync_response(
        sender: ActorRef,
        receiver: ActorRef,
        payload: Payload,
        request_id: RequestId,
    ) -> Self {
        Self {
            sender,
            receiver,
            payload,
            request_id: Some(request_id),
            is_sync_response: true,
        }
    }

    /// Whether `pending_sync` dispatch (spec.md §4.5 step 4) applies to
    /// this message: a sync response matching the current actor's
    /// outstanding request table takes precedence over the current
    /// behavior.
    pub fn is_pending_sync_candidate(&self) -> bool {
        self.is_sync_response && self.request_id.is_some()
    }
}
