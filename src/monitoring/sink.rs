//! The process-wide monitoring dispatch point every subsystem emits through.
//!
//! `Monitor<E>: Clone` makes `dyn Monitor<E>` object-unsafe, and the rest of
//! the crate is deliberately not generic over a monitor type parameter the
//! way airssys-rt's `SupervisorNode<S, C, M>` is (actors are spawned
//! dynamically through a type-erased [`crate::actor::Initializer`], with no
//! per-actor type slot to carry `M` in). Instead each event type gets one
//! process-wide [`InMemoryMonitor`], gated by [`set_enabled`] so a caller
//! who never turns monitoring on pays only the cost of an atomic load per
//! hot-path call site, matching [`NoopMonitor`]'s zero-overhead intent
//! without needing runtime dispatch to choose between the two.
//!
//! [`SystemConfig::enable_metrics`](crate::system::SystemConfig) drives
//! [`set_enabled`] at bootstrap; tests call it directly.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use chrono::Utc;

use super::in_memory::InMemoryMonitor;
use super::traits::Monitor;
use super::types::{
    ActorEvent, ActorEventKind, GroupEvent, GroupEventKind, MailboxEvent, MailboxEventKind,
    MonitoringConfig, SyncEvent, SyncEventKind, SystemEvent, SystemEventKind, TransportEvent,
    TransportEventKind,
};
use crate::util::ActorId;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Turn monitoring emission on or off process-wide (spec.md §2's
/// `enable_metrics` knob).
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Release);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Acquire)
}

fn actor_sink() -> &'static InMemoryMonitor<ActorEvent> {
    static SINK: OnceLock<InMemoryMonitor<ActorEvent>> = OnceLock::new();
    SINK.get_or_init(|| InMemoryMonitor::new(MonitoringConfig::default()))
}

fn system_sink() -> &'static InMemoryMonitor<SystemEvent> {
    static SINK: OnceLock<InMemoryMonitor<SystemEvent>> = OnceLock::new();
    SINK.get_or_init(|| InMemoryMonitor::new(MonitoringConfig::default()))
}

fn transport_sink() -> &'static InMemoryMonitor<TransportEvent> {
    static SINK: OnceLock<InMemoryMonitor<TransportEvent>> = OnceLock::new();
    SINK.get_or_init(|| InMemoryMonitor::new(MonitoringConfig::default()))
}

fn sync_sink() -> &'static InMemoryMonitor<SyncEvent> {
    static SINK: OnceLock<InMemoryMonitor<SyncEvent>> = OnceLock::new();
    SINK.get_or_init(|| InMemoryMonitor::new(MonitoringConfig::default()))
}

fn group_sink() -> &'static InMemoryMonitor<GroupEvent> {
    static SINK: OnceLock<InMemoryMonitor<GroupEvent>> = OnceLock::new();
    SINK.get_or_init(|| InMemoryMonitor::new(MonitoringConfig::default()))
}

fn mailbox_sink() -> &'static InMemoryMonitor<MailboxEvent> {
    static SINK: OnceLock<InMemoryMonitor<MailboxEvent>> = OnceLock::new();
    SINK.get_or_init(|| InMemoryMonitor::new(MonitoringConfig::default()))
}

/// A snapshot of everything recorded on the actor-event sink so far, for
/// tests and operators (empty unless [`set_enabled`] was called).
pub async fn actor_snapshot() -> Vec<ActorEvent> {
    actor_sink()
        .snapshot()
        .await
        .map(|s| s.recent_events)
        .unwrap_or_default()
}

pub(crate) fn emit_actor(actor_id: ActorId, event_kind: ActorEventKind) {
    if !is_enabled() {
        return;
    }
    let event = ActorEvent {
        timestamp: Utc::now(),
        actor_id,
        event_kind,
        metadata: HashMap::new(),
    };
    let sink = actor_sink();
    tokio::spawn(async move {
        let _ = sink.record(event).await;
    });
}

pub(crate) fn emit_system(event_kind: SystemEventKind) {
    if !is_enabled() {
        return;
    }
    let event = SystemEvent {
        timestamp: Utc::now(),
        event_kind,
        metadata: HashMap::new(),
    };
    let sink = system_sink();
    tokio::spawn(async move {
        let _ = sink.record(event).await;
    });
}

pub(crate) fn emit_transport(event_kind: TransportEventKind) {
    if !is_enabled() {
        return;
    }
    let event = TransportEvent {
        timestamp: Utc::now(),
        event_kind,
        metadata: HashMap::new(),
    };
    let sink = transport_sink();
    tokio::spawn(async move {
        let _ = sink.record(event).await;
    });
}

pub(crate) fn emit_sync(actor_id: ActorId, event_kind: SyncEventKind) {
    if !is_enabled() {
        return;
    }
    let event = SyncEvent {
        timestamp: Utc::now(),
        actor_id,
        event_kind,
        metadata: HashMap::new(),
    };
    let sink = sync_sink();
    tokio::spawn(async move {
        let _ = sink.record(event).await;
    });
}

pub(crate) fn emit_group(event_kind: GroupEventKind) {
    if !is_enabled() {
        return;
    }
    let event = GroupEvent {
        timestamp: Utc::now(),
        event_kind,
        metadata: HashMap::new(),
    };
    let sink = group_sink();
    tokio::spawn(async move {
        let _ = sink.record(event).await;
    });
}

pub(crate) fn emit_mailbox(actor_id: ActorId, event_kind: MailboxEventKind) {
    if !is_enabled() {
        return;
    }
    let event = MailboxEvent {
        timestamp: Utc::now(),
        actor_id,
        event_kind,
        metadata: HashMap::new(),
    };
    let sink = mailbox_sink();
    tokio::spawn(async move {
        let _ = sink.record(event).await;
    });
}
