//! A handle to an actor, local or remote (spec.md §3).

// Layer 1: Standard library imports
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::cell::ActorCell;
use crate::message::Envelope;
use crate::payload::Payload;
use crate::transport::proxy::ProxyActor;
use crate::util::{ActorId, GlobalActorId, NodeId};

/// A reference to an actor: either a direct pointer to a local
/// [`ActorCell`] or a [`ProxyActor`] standing in for a remote one.
///
/// Both variants expose the same send/monitor/link surface (spec.md §3);
/// callers generally never need to match on which one they hold.
#[derive(Clone)]
pub enum ActorRef {
    Local(Arc<ActorCell>),
    Remote(Arc<ProxyActor>),
}

impl ActorRef {
    pub fn id(&self) -> ActorId {
        match self {
            ActorRef::Local(cell) => cell.id(),
            ActorRef::Remote(proxy) => proxy.actor_id(),
        }
    }

    pub fn node(&self) -> NodeId {
        match self {
            ActorRef::Local(cell) => cell.node(),
            ActorRef::Remote(proxy) => proxy.node(),
        }
    }

    pub fn global_id(&self) -> GlobalActorId {
        GlobalActorId::new(self.node(), self.id())
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ActorRef::Local(_))
    }

    pub fn is_exited(&self) -> bool {
        match self {
            ActorRef::Local(cell) => cell.is_exited(),
            ActorRef::Remote(proxy) => proxy.is_unreachable(),
        }
    }

    /// Deliver a fully-formed envelope, used internally by `send`,
    /// `sync_send`, `reply`, and `forward_to`.
    pub(crate) fn enqueue_foreign(&self, envelope: Envelope) {
        match self {
            ActorRef::Local(cell) => {
                let enqueued = cell.mailbox().enqueue(envelope);
                if enqueued.was_empty() {
                    crate::scheduler::notify_runnable(self.clone());
                }
            }
            ActorRef::Remote(proxy) => proxy.enqueue(envelope),
        }
    }

    /// Register `observer` as a monitor of this actor: it will receive a
    /// `DOWN(actor_id, reason)` message when this actor exits.
    pub fn add_monitor(&self, observer: ActorRef) {
        match self {
            ActorRef::Local(cell) => {
                cell.monitors().insert(observer);
            }
            ActorRef::Remote(proxy) => proxy.add_monitor(observer),
        }
    }

    pub fn remove_monitor(&self, observer: &ActorRef) {
        match self {
            ActorRef::Local(cell) => {
                cell.monitors().remove(observer);
            }
            ActorRef::Remote(proxy) => proxy.remove_monitor(observer),
        }
    }

    /// Link this actor bidirectionally with `peer`. Either side exiting
    /// abnormally kills the other (spec.md §4.3).
    pub fn add_link(&self, peer: ActorRef) {
        match self {
            ActorRef::Local(cell) => {
                cell.links().insert(peer);
            }
            ActorRef::Remote(proxy) => proxy.add_link(peer),
        }
    }

    pub fn remove_link(&self, peer: &ActorRef) {
        match self {
            ActorRef::Local(cell) => {
                cell.links().remove(peer);
            }
            ActorRef::Remote(proxy) => proxy.remove_link(peer),
        }
    }
}

impl Debug for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRef::Local(_) => write!(f, "ActorRef::Local({})", self.global_id()),
            ActorRef::Remote(_) => write!(f, "ActorRef::Remote({})", self.global_id()),
        }
    }
}

/// Reference equality by `(node, actor)`, satisfying spec.md §3 invariant
/// 4: re-resolving the same remote address returns an object this
/// equality treats as identical.
impl PartialEq for ActorRef {
    fn eq(&self, other: &Self) -> bool {
        self.global_id() == other.global_id()
    }
}

impl Eq for ActorRef {}

impl Hash for ActorRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.global_id().hash(state);
    }
}

/// Construct an ordinary message [`Envelope`] addressed `from -> to` and
/// hand it to `to`'s mailbox (or proxy connection).
pub fn send(from: ActorRef, to: &ActorRef, payload: Payload) {
    to.enqueue_foreign(Envelope::message(from, to.clone(), payload));
}
