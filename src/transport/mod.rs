//! Cross-node actor addressing: TCP listeners/connectors, the wire codec,
//! and the [`ProxyActor`] that makes a remote actor look like any other
//! [`crate::actor::ActorRef`] (spec.md §4.7, §4.8).

// Layer 1: Standard library imports
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use tokio::net::TcpListener;

// Layer 3: Internal module imports
use crate::actor::ActorRef;
use crate::util::NodeId;

pub mod connection;
pub mod error;
pub mod proxy;
pub mod wire;

pub use error::TransportError;
pub use proxy::ProxyActor;

/// Per-`(host, port)` dedup cache behind `remote_actor`'s idempotent
/// identity guarantee (spec.md §4.7, §8 invariant 5).
fn remote_cache() -> &'static DashMap<(String, u16), ActorRef> {
    static CACHE: OnceLock<DashMap<(String, u16), ActorRef>> = OnceLock::new();
    CACHE.get_or_init(DashMap::new)
}

/// Bind a listener on `bind_address`, advertising `actor` as the answer to
/// every accepted connection's lookup RPC (spec.md §4.7).
///
/// Fails with [`TransportError::BindFailure`] if the port is taken; retrying
/// on the next port (spec.md §8 scenario S5) is the caller's job, matching
/// `SystemConfig::bind_retry_attempts`.
pub async fn publish(actor: ActorRef, bind_address: SocketAddr) -> Result<(), TransportError> {
    let listener = TcpListener::bind(bind_address).await.map_err(|source| {
        crate::monitoring::sink::emit_transport(crate::monitoring::TransportEventKind::BindFailure {
            address: bind_address.to_string(),
        });
        TransportError::BindFailure {
            address: bind_address,
            source,
        }
    })?;

    crate::monitoring::sink::emit_transport(crate::monitoring::TransportEventKind::Published {
        address: bind_address.to_string(),
    });

    let actor_id = actor.id();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _peer)) = listener.accept().await else {
                return;
            };
            tokio::spawn(connection::establish(stream, false, Some(actor_id)));
        }
    });
    Ok(())
}

/// Resolve `(host, port)` to a [`ActorRef::Remote`], connecting and
/// performing the lookup RPC on first reference (spec.md §4.7).
///
/// A second call with the same arguments returns a reference-equal
/// [`ActorRef`] without touching the network again.
pub async fn remote_actor(host: &str, port: u16) -> Result<ActorRef, TransportError> {
    let key = (host.to_owned(), port);
    if let Some(existing) = remote_cache().get(&key) {
        crate::monitoring::sink::emit_transport(crate::monitoring::TransportEventKind::ConnectionReused {
            node: format!("{host}:{port}"),
        });
        return Ok(existing.clone());
    }

    let address = format!("{host}:{port}");
    let stream = tokio::net::TcpStream::connect(&address)
        .await
        .map_err(|source| TransportError::ConnectionLost {
            node: NodeId::from_raw(0),
            source,
        })?;

    let connection = connection::establish(stream, true, None)
        .await
        .map_err(|source| TransportError::ConnectionLost {
            node: NodeId::from_raw(0),
            source,
        })?;

    let Some(actor_id) = connection.lookup().await else {
        crate::monitoring::sink::emit_transport(crate::monitoring::TransportEventKind::LookupFailed {
            address,
        });
        // spec.md §7: `UnknownActor` is not raised to the caller — it
        // returns a dead `ActorRef` whose first message produces
        // `DOWN(no_such_actor)` to whatever monitors are registered on it.
        let dead_ref = ActorRef::Remote(connection.dead_proxy(crate::actor::ExitReason::NoSuchActor));
        remote_cache().insert(key, dead_ref.clone());
        return Ok(dead_ref);
    };

    crate::monitoring::sink::emit_transport(crate::monitoring::TransportEventKind::Connected {
        node: format!("{:?}", connection.peer_node()),
    });

    let actor_ref = ActorRef::Remote(connection.proxy_for(actor_id));
    remote_cache().insert(key, actor_ref.clone());
    Ok(actor_ref)
}
