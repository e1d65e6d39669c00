//! One TCP connection to a peer node: handshake, framing, and the
//! inbound/outbound frame loops (spec.md §4.7, §6).
//!
//! A `DownNotification` frame is used for exactly one purpose here: a
//! link-propagated kill. When a local actor linked to a [`super::proxy::ProxyActor`]
//! exits abnormally, `ProxyActor::kill` sends `DownNotification { actor_id, reason }`
//! naming the *remote* actor it represents; the node that actually owns
//! that id receives the frame below and finalizes its own local actor with
//! the same reason. A remote actor reporting its own ordinary exit never
//! needs this frame at all — `DOWN` to a remote monitor already travels as
//! an ordinary `UserMessage` addressed to that monitor's real mailbox,
//! because `ProxyActor::enqueue` marshals any envelope the same way
//! regardless of payload contents.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

// Layer 2: Third-party crate imports
use bytes::{Bytes, BytesMut};
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::Rng;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

// Layer 3: Internal module imports
use crate::actor::exit::ExitReason;
use crate::actor::ActorRef;
use crate::message::Envelope;
use crate::payload::Payload;
use crate::transport::proxy::ProxyActor;
use crate::transport::wire::{self, WireMessage};
use crate::util::{ActorId, NodeId};

/// One established connection to a peer node.
///
/// Outbound frames funnel through an unbounded channel into a single
/// writer task so concurrent callers never interleave partial frames.
/// Inbound frames are read by a dedicated task for the connection's whole
/// lifetime; it is the only place that ever populates `proxies`.
pub struct Connection {
    peer_node: NodeId,
    peer_addr: SocketAddr,
    outbound: mpsc::UnboundedSender<WireMessage>,
    proxies: DashMap<ActorId, Weak<ProxyActor>>,
    lookup_waiters: Mutex<VecDeque<oneshot::Sender<Option<ActorId>>>>,
    /// The actor this connection's listener advertised, if it was accepted
    /// rather than dialed (spec.md §4.7's `publish`/lookup RPC).
    published: Option<ActorId>,
    closed: AtomicBool,
}

fn connections() -> &'static DashMap<NodeId, Arc<Connection>> {
    use std::sync::OnceLock;
    static TABLE: OnceLock<DashMap<NodeId, Arc<Connection>>> = OnceLock::new();
    TABLE.get_or_init(DashMap::new)
}

/// Tell every currently connected peer to subscribe `subscriber` to
/// `module:name` (spec.md §4.6's remote-group transparency). There is no
/// dedicated "group server" address in this transport — a `remote` group's
/// origin is whichever peer this node already has a connection to, so the
/// registration fans out over all of them; `handle_remote_subscribe` on
/// the receiving end is a no-op for a peer that has nothing to do with
/// this group beyond holding an (empty) membership set for it.
pub(crate) fn broadcast_group_subscribe(module: &str, name: &str, subscriber: &ActorRef) {
    for entry in connections().iter() {
        entry.value().send_group_subscribe(module, name, subscriber);
    }
}

/// Forward a local publish to every connected peer so a `remote` group's
/// membership on other nodes converges (spec.md §4.6).
pub(crate) fn broadcast_group_publish(module: &str, name: &str, payload: &Payload) {
    for entry in connections().iter() {
        entry.value().send_group_publish(module, name, payload.clone());
    }
}

impl Connection {
    pub fn peer_node(&self) -> NodeId {
        self.peer_node
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub(crate) fn send_user_message(&self, remote_actor: ActorId, envelope: Envelope) {
        let message = WireMessage::UserMessage {
            sender_node: crate::scheduler::local_node(),
            sender_id: envelope.sender.id(),
            receiver_id: remote_actor,
            request_id: envelope.request_id,
            is_response: envelope.is_sync_response,
            payload: envelope.payload,
        };
        let _ = self.outbound.send(message);
    }

    pub(crate) fn request_monitor(&self, remote_actor: ActorId, observer: &ActorRef) {
        let _ = self.outbound.send(WireMessage::MonitorRequest {
            actor_id: remote_actor,
            observer_node: observer.node(),
            observer_id: observer.id(),
            release: false,
        });
    }

    /// Tell the peer owning `remote_actor` that `observer` no longer needs
    /// to be told about it — sent when a [`ProxyActor`]'s last local
    /// reference drops (spec.md §4.8's "the remote peer is informed so it
    /// can release its bookkeeping").
    pub(crate) fn release_monitor(
        &self,
        remote_actor: ActorId,
        observer_node: NodeId,
        observer_id: ActorId,
    ) {
        let _ = self.outbound.send(WireMessage::MonitorRequest {
            actor_id: remote_actor,
            observer_node,
            observer_id,
            release: true,
        });
    }

    pub(crate) fn send_down_notification(&self, actor_id: ActorId, reason: ExitReason) {
        let _ = self
            .outbound
            .send(WireMessage::DownNotification { actor_id, reason });
    }

    /// Register `subscriber` with this connection's peer as a member of
    /// `module:name` (spec.md §4.6's "registers a proxy subscriber on B via
    /// the transport").
    pub(crate) fn send_group_subscribe(&self, module: &str, name: &str, subscriber: &ActorRef) {
        let _ = self.outbound.send(WireMessage::GroupSubscribe {
            module: module.to_owned(),
            name: name.to_owned(),
            subscriber_node: subscriber.node(),
            subscriber_id: subscriber.id(),
        });
    }

    /// Forward a local publish to this connection's peer so its own copy of
    /// `module:name` converges (spec.md §4.6).
    pub(crate) fn send_group_publish(&self, module: &str, name: &str, payload: Payload) {
        let _ = self.outbound.send(WireMessage::GroupPublish {
            module: module.to_owned(),
            name: name.to_owned(),
            payload,
        });
    }

    /// The lookup RPC behind `remote_actor` (spec.md §4.7): send a
    /// `LookupRequest` and wait for the matching `LookupReply`. Concurrent
    /// callers on the same connection queue behind `lookup_waiters` since
    /// neither frame carries a request id of its own.
    pub(crate) async fn lookup(&self) -> Option<ActorId> {
        let (tx, rx) = oneshot::channel();
        self.lookup_waiters.lock().push_back(tx);
        let _ = self.outbound.send(WireMessage::LookupRequest);
        rx.await.ok().flatten()
    }

    /// The proxy representing `actor_id` on the peer node, creating one on
    /// first reference and reusing it (via its `Weak`) afterward.
    pub(crate) fn proxy_for(self: &Arc<Self>, actor_id: ActorId) -> Arc<ProxyActor> {
        if let Some(existing) = self.proxies.get(&actor_id).and_then(|w| w.upgrade()) {
            return existing;
        }
        let proxy = ProxyActor::new(actor_id, self.peer_node, Arc::clone(self));
        self.proxies.insert(actor_id, Arc::downgrade(&proxy));
        proxy
    }

    /// A permanently unreachable proxy for a lookup that found no published
    /// actor (spec.md §7's `UnknownActor`): not tracked in `proxies` since
    /// it has no real peer identity to dedup by.
    pub(crate) fn dead_proxy(self: &Arc<Self>, reason: ExitReason) -> Arc<ProxyActor> {
        ProxyActor::dead(ActorId::from_raw(0), self.peer_node, Arc::clone(self), reason)
    }

    /// Drop this connection's cached weak entry for `actor_id`, but only if
    /// its `Arc<ProxyActor>` has already hit zero strong references — a
    /// fresh `proxy_for` call racing with a [`ProxyActor`]'s `Drop` may have
    /// already replaced the entry with a live one.
    pub(crate) fn forget_proxy(&self, actor_id: ActorId) {
        if let Some(entry) = self.proxies.get(&actor_id) {
            if entry.strong_count() == 0 {
                drop(entry);
                self.proxies.remove(&actor_id);
            }
        }
    }

    /// Mark this connection, and every proxy it has handed out, gone
    /// (spec.md §4.7's "remote DOWN" on connection loss).
    fn mark_lost(self: &Arc<Self>) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        crate::monitoring::sink::emit_transport(crate::monitoring::TransportEventKind::ConnectionLost {
            node: format!("{:?}", self.peer_node),
        });
        for entry in self.proxies.iter() {
            if let Some(proxy) = entry.value().upgrade() {
                proxy.mark_unreachable(ExitReason::ConnectionLost);
            }
        }
        for waiter in self.lookup_waiters.lock().drain(..) {
            let _ = waiter.send(None);
        }
        connections().remove(&self.peer_node);
    }
}

async fn read_frame(reader: &mut OwnedReadHalf) -> io::Result<WireMessage> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf) as usize;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    let mut bytes = Bytes::from(body);
    wire::decode(&mut bytes)
}

async fn write_frame(writer: &mut OwnedWriteHalf, message: &WireMessage) -> io::Result<()> {
    let mut body = BytesMut::new();
    wire::encode(message, &mut body);
    writer.write_u32(body.len() as u32).await?;
    writer.write_all(&body).await?;
    writer.flush().await
}

/// Perform the handshake (spec.md §4.7 step 1-3) over a freshly connected
/// or accepted socket and register the resulting [`Connection`] in the
/// process-wide `NodeId` map, short-circuiting to an existing entry if one
/// already won the race.
pub(crate) async fn establish(
    stream: TcpStream,
    as_client: bool,
    published: Option<ActorId>,
) -> io::Result<Arc<Connection>> {
    let peer_addr = stream.peer_addr()?;
    let (mut read_half, mut write_half) = stream.into_split();

    let local_node = crate::scheduler::local_node();
    let nonce: u64 = rand::thread_rng().gen();

    let peer_node = if as_client {
        write_frame(
            &mut write_half,
            &WireMessage::Handshake {
                node: local_node,
                nonce,
            },
        )
        .await?;
        match read_frame(&mut read_half).await? {
            WireMessage::HandshakeAck { node, .. } => node,
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("expected handshake ack, got {other:?}"),
                ))
            }
        }
    } else {
        match read_frame(&mut read_half).await? {
            WireMessage::Handshake { node, nonce } => {
                write_frame(
                    &mut write_half,
                    &WireMessage::HandshakeAck {
                        node: local_node,
                        nonce,
                    },
                )
                .await?;
                node
            }
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("expected handshake, got {other:?}"),
                ))
            }
        }
    };

    // "A second connect attempt to the same peer short-circuits to the
    // existing connection" (spec.md §4.7 step 3).
    if let Some(existing) = connections().get(&peer_node) {
        return Ok(Arc::clone(existing.value()));
    }

    let (tx, rx) = mpsc::unbounded_channel();
    let connection = Arc::new(Connection {
        peer_node,
        peer_addr,
        outbound: tx,
        proxies: DashMap::new(),
        lookup_waiters: Mutex::new(VecDeque::new()),
        published,
        closed: AtomicBool::new(false),
    });
    connections().insert(peer_node, Arc::clone(&connection));

    tokio::spawn(write_loop(write_half, rx, Arc::clone(&connection)));
    tokio::spawn(read_loop(read_half, Arc::clone(&connection)));

    Ok(connection)
}

async fn write_loop(
    mut write_half: OwnedWriteHalf,
    mut rx: mpsc::UnboundedReceiver<WireMessage>,
    connection: Arc<Connection>,
) {
    while let Some(message) = rx.recv().await {
        if write_frame(&mut write_half, &message).await.is_err() {
            break;
        }
    }
    connection.mark_lost();
}

async fn read_loop(mut read_half: OwnedReadHalf, connection: Arc<Connection>) {
    loop {
        match read_frame(&mut read_half).await {
            Ok(message) => handle_inbound(&connection, message),
            Err(_) => break,
        }
    }
    connection.mark_lost();
}

/// Apply one decoded frame's effect (spec.md §4.7's inbound translation
/// and this module's `DownNotification` convention above).
fn handle_inbound(connection: &Arc<Connection>, message: WireMessage) {
    match message {
        WireMessage::UserMessage {
            sender_id,
            receiver_id,
            request_id,
            is_response,
            payload,
            ..
        } => {
            let Some(slot) = crate::scheduler::registry::lookup(receiver_id) else {
                return;
            };
            let sender = ActorRef::Remote(connection.proxy_for(sender_id));
            let receiver = ActorRef::Local(Arc::clone(&slot.cell));
            let envelope = match (request_id, is_response) {
                (Some(id), true) => Envelope::sync_response(sender, receiver.clone(), payload, id),
                (Some(id), false) => Envelope::sync_request(sender, receiver.clone(), payload, id),
                (_, _) => Envelope::message(sender, receiver.clone(), payload),
            };
            receiver.enqueue_foreign(envelope);
        }
        WireMessage::LookupRequest => {
            let reply = WireMessage::LookupReply {
                actor_id: connection.published,
            };
            let _ = connection.outbound.send(reply);
        }
        WireMessage::LookupReply { actor_id } => {
            if let Some(waiter) = connection.lookup_waiters.lock().pop_front() {
                let _ = waiter.send(actor_id);
            }
        }
        WireMessage::MonitorRequest {
            actor_id,
            observer_id,
            release,
            ..
        } => {
            if let Some(slot) = crate::scheduler::registry::lookup(actor_id) {
                let observer = ActorRef::Remote(connection.proxy_for(observer_id));
                if release {
                    slot.cell.monitors().remove(&observer);
                } else {
                    slot.cell.monitors().insert(observer);
                }
            }
        }
        WireMessage::DownNotification { actor_id, reason } => {
            if let Some(slot) = crate::scheduler::registry::lookup(actor_id) {
                crate::scheduler::finalize_exit(&slot.cell, reason);
            }
        }
        WireMessage::GroupSubscribe {
            module,
            name,
            subscriber_id,
            ..
        } => {
            let subscriber = ActorRef::Remote(connection.proxy_for(subscriber_id));
            crate::group::handle_remote_subscribe(&module, &name, subscriber);
        }
        WireMessage::GroupPublish {
            module,
            name,
            payload,
        } => {
            crate::group::handle_remote_publish(&module, &name, payload);
        }
        WireMessage::Handshake { .. } | WireMessage::HandshakeAck { .. } => {
            // Only expected once, during `establish`; a peer that resends
            // one mid-connection is ignored rather than torn down.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{send, ActorCell, ActorFlavor};
    use crate::payload;

    fn local_ref() -> ActorRef {
        ActorRef::Local(Arc::new(ActorCell::new(
            ActorId::next(),
            NodeId::generate(),
            ActorFlavor::EventBased,
        )))
    }

    /// spec.md §7's `UnknownActor`: a lookup against a peer that never
    /// published anything comes back empty, not as an error.
    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn lookup_against_an_unpublished_peer_yields_no_actor() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let accepted = tokio::spawn(async move {
            let (stream, _peer) = listener.accept().await.unwrap();
            establish(stream, false, None).await.unwrap()
        });

        let client_stream = TcpStream::connect(addr).await.unwrap();
        let client = establish(client_stream, true, None).await.unwrap();
        let _server = accepted.await.unwrap();

        assert_eq!(client.lookup().await, None);
    }

    /// spec.md §4.8/§7: the dead proxy `remote_actor` hands back for an
    /// `UnknownActor` lookup stays silent until its first message, at
    /// which point every monitor registered by then receives
    /// `DOWN(no_such_actor)` (spec.md §8 invariant 6's DOWN delivery,
    /// applied to a proxy that was never backed by a real remote actor).
    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn a_dead_proxys_first_message_notifies_its_monitors() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let accepted = tokio::spawn(async move {
            let (stream, _peer) = listener.accept().await.unwrap();
            establish(stream, false, None).await.unwrap()
        });
        let client_stream = TcpStream::connect(addr).await.unwrap();
        let client = establish(client_stream, true, None).await.unwrap();
        let _server = accepted.await.unwrap();
        assert_eq!(client.lookup().await, None);

        let dead = client.dead_proxy(ExitReason::NoSuchActor);
        let dead_ref = ActorRef::Remote(Arc::clone(&dead));
        assert!(dead_ref.is_exited());

        let observer = local_ref();
        dead_ref.add_monitor(observer.clone());

        let ActorRef::Local(observer_cell) = &observer else {
            unreachable!()
        };
        assert!(observer_cell.mailbox().is_empty());

        send(local_ref(), &dead_ref, payload![crate::atom::intern("hello")]);

        assert!(!observer_cell.mailbox().is_empty());
        let envelope = match observer_cell.mailbox().dequeue() {
            crate::mailbox::Dequeued::Message(envelope) => envelope,
            crate::mailbox::Dequeued::Empty => panic!("expected a DOWN message"),
        };
        assert_eq!(envelope.payload.values()[0].as_atom().unwrap().as_str(), "down");
        assert_eq!(
            envelope.payload.values()[2].as_atom().unwrap().as_str(),
            "no_such_actor"
        );
    }

    /// spec.md §4.8: dropping the last local reference to a `ProxyActor`
    /// tells the peer to forget any monitor registrations it made on our
    /// behalf, instead of leaking them in the owning actor's monitor set
    /// for the rest of its lifetime.
    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn dropping_a_proxys_last_reference_releases_its_remote_monitors() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let accepted = tokio::spawn(async move {
            let (stream, _peer) = listener.accept().await.unwrap();
            establish(stream, false, None).await.unwrap()
        });
        let client_stream = TcpStream::connect(addr).await.unwrap();
        let client = establish(client_stream, true, None).await.unwrap();
        let _server = accepted.await.unwrap();

        let owned = Arc::new(ActorCell::new(
            ActorId::next(),
            NodeId::generate(),
            ActorFlavor::EventBased,
        ));
        crate::scheduler::registry::insert(
            owned.id(),
            Arc::new(crate::scheduler::registry::ActorSlot::unschedulable(Arc::clone(&owned))),
        );

        let proxy = client.proxy_for(owned.id());
        let observer = local_ref();
        proxy.add_monitor(observer.clone());
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert_eq!(owned.monitors().len(), 1);

        drop(proxy);
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert_eq!(owned.monitors().len(), 0);
    }
}
