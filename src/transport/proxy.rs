//! A local stand-in for a remote actor (spec.md §4.8).

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashSet;
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::actor::exit::ExitReason;
use crate::actor::ActorRef;
use crate::message::Envelope;
use crate::transport::connection::Connection;
use crate::util::{ActorId, NodeId};

/// Stands in for an actor living on another node (spec.md §4.8).
///
/// Has no mailbox and no behavior: `enqueue` marshals onto `connection`
/// instead of a local queue, and `monitors`/`links` hold only the local
/// bookkeeping needed to answer `DOWN` without a round trip once the peer
/// is known to be gone.
pub struct ProxyActor {
    actor_id: ActorId,
    node: NodeId,
    connection: Arc<Connection>,
    monitors: DashSet<ActorRef>,
    links: DashSet<ActorRef>,
    unreachable: AtomicBool,
    notified: AtomicBool,
    dead_reason: Mutex<Option<ExitReason>>,
}

impl ProxyActor {
    pub(crate) fn new(actor_id: ActorId, node: NodeId, connection: Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            actor_id,
            node,
            connection,
            monitors: DashSet::new(),
            links: DashSet::new(),
            unreachable: AtomicBool::new(false),
            notified: AtomicBool::new(false),
            dead_reason: Mutex::new(None),
        })
    }

    /// A proxy for an address that never resolved to a real remote actor
    /// (spec.md §7's `UnknownActor`): permanently unreachable from the
    /// start, but monitors are only told on the first message sent to it,
    /// not at construction — `remote_actor` typically returns this before
    /// the caller has had a chance to `monitor` it.
    pub(crate) fn dead(
        actor_id: ActorId,
        node: NodeId,
        connection: Arc<Connection>,
        reason: ExitReason,
    ) -> Arc<Self> {
        let proxy = Self::new(actor_id, node, connection);
        proxy.unreachable.store(true, Ordering::Release);
        *proxy.dead_reason.lock() = Some(reason);
        proxy
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_unreachable(&self) -> bool {
        self.unreachable.load(Ordering::Acquire) || self.connection.is_closed()
    }

    /// Marshal `envelope` onto the connection as a `UserMessage` frame
    /// (spec.md §4.7's outbound rewriting: the receiver id is this proxy's
    /// remote identity, the sender is translated on the wire by
    /// `Connection::send_user_message`).
    ///
    /// A dead proxy (spec.md §7's `UnknownActor`) never reaches the
    /// connection: its first message instead fans `DOWN(no_such_actor)` out
    /// to whatever monitors are registered by then.
    pub fn enqueue(self: &Arc<Self>, envelope: Envelope) {
        if self.is_unreachable() {
            if let Some(reason) = *self.dead_reason.lock() {
                self.mark_unreachable(reason);
            }
            return;
        }
        self.connection.send_user_message(self.actor_id, envelope);
    }

    /// Ask the remote node to watch `self.actor_id` on `observer`'s behalf
    /// (spec.md §6's `MonitorRequest`), in addition to remembering
    /// `observer` locally so a connection loss can be reported without
    /// waiting on the peer.
    pub fn add_monitor(&self, observer: ActorRef) {
        self.connection.request_monitor(self.actor_id, &observer);
        self.monitors.insert(observer);
    }

    pub fn remove_monitor(&self, observer: &ActorRef) {
        self.monitors.remove(observer);
    }

    pub fn add_link(&self, peer: ActorRef) {
        self.links.insert(peer);
    }

    pub fn remove_link(&self, peer: &ActorRef) {
        self.links.remove(peer);
    }

    /// A local peer linked to this proxy exited abnormally; tell the node
    /// that actually owns `actor_id` to exit it too.
    ///
    /// The wire protocol's closed `msg_type` set has no dedicated
    /// link-exit frame, so this reuses `DownNotification` addressed to
    /// `self.actor_id` — on the owning side, [`Connection`]'s inbound loop
    /// treats a `DownNotification` naming one of *its own* registered
    /// actors as a link-propagated kill rather than a self-report (see
    /// `transport::connection`'s module doc).
    pub fn kill(&self, _peer: ActorRef, reason: ExitReason) {
        self.connection.send_down_notification(self.actor_id, reason);
    }

    /// Called once this proxy's connection is confirmed gone, or the
    /// remote actor has reported its own exit: fan `DOWN` out to every
    /// local monitor and propagate to local links, mirroring
    /// `scheduler::finalize_exit` for a local cell.
    pub(crate) fn mark_unreachable(self: &Arc<Self>, reason: ExitReason) {
        self.unreachable.store(true, Ordering::Release);
        if self.notified.swap(true, Ordering::AcqRel) {
            return;
        }

        let down = crate::scheduler::down_payload(self.actor_id, reason);
        let self_ref = ActorRef::Remote(Arc::clone(self));
        for observer in self.monitors.iter() {
            observer.enqueue_foreign(Envelope::message(
                self_ref.clone(),
                observer.clone(),
                down.clone(),
            ));
        }
        self.monitors.clear();

        if reason.is_abnormal() {
            for peer in self.links.iter() {
                crate::scheduler::kill_peer(&peer, reason);
            }
        }
        self.links.clear();
    }
}

impl Drop for ProxyActor {
    /// spec.md §4.8: "reference counted; when the last local reference
    /// drops, the remote peer is informed so it can release its
    /// bookkeeping." Any observer still in `monitors` at this point had its
    /// `MonitorRequest` answered by an insert into the owning actor's
    /// monitor set on the peer; releasing each one here undoes that insert
    /// instead of leaving it to leak for the owning actor's whole lifetime.
    /// A proxy that already went through `mark_unreachable` has an empty
    /// `monitors` by then, so this is a no-op in that case.
    fn drop(&mut self) {
        for observer in self.monitors.iter() {
            self.connection
                .release_monitor(self.actor_id, observer.node(), observer.id());
        }
        self.connection.forget_proxy(self.actor_id);
    }
}
