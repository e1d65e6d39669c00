//! Monitoring event types and configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::traits::{EventSeverity, MonitoringEvent};
use crate::util::ActorId;

/// Configuration for monitoring behavior.
///
/// Controls how events are recorded, filtered, and stored in the monitor.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringConfig {
    /// Whether monitoring is enabled
    pub enabled: bool,

    /// Maximum number of events to keep in history
    pub max_history_size: usize,

    /// Minimum severity level to record (events below this are filtered)
    pub severity_filter: EventSeverity,

    /// Interval for snapshot generation (if using background snapshots)
    #[serde(with = "crate::util::duration_serde")]
    pub snapshot_interval: Duration,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history_size: 1000,
            severity_filter: EventSeverity::Info,
            snapshot_interval: Duration::from_secs(60),
        }
    }
}

/// Snapshot of monitoring state at a point in time.
///
/// Provides queryable access to monitoring counters and recent event history.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSnapshot<E: MonitoringEvent> {
    /// Timestamp when snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Total number of events recorded
    pub total_events: u64,

    /// Number of trace-level events
    pub trace_count: u64,

    /// Number of debug-level events
    pub debug_count: u64,

    /// Number of info-level events
    pub info_count: u64,

    /// Number of warning-level events
    pub warning_count: u64,

    /// Number of error-level events
    pub error_count: u64,

    /// Number of critical-level events
    pub critical_count: u64,

    /// Recent events (up to max_history_size)
    pub recent_events: Vec<E>,
}

// ============================================================================
// Actor Events
// ============================================================================

/// Events related to actor lifecycle and message dispatch (spec.md §4.3,
/// §4.4).
#[derive(Debug, Clone, Serialize)]
pub struct ActorEvent {
    /// Timestamp when event occurred (§3.2 chrono DateTime<Utc>)
    pub timestamp: DateTime<Utc>,

    /// ID of the actor
    pub actor_id: ActorId,

    /// Specific actor event type
    pub event_kind: ActorEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for ActorEvent {
    const EVENT_TYPE: &'static str = "actor";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            ActorEventKind::Spawned => EventSeverity::Debug,
            ActorEventKind::Started => EventSeverity::Info,
            ActorEventKind::MessageReceived { .. } => EventSeverity::Trace,
            ActorEventKind::MessageProcessed { .. } => EventSeverity::Trace,
            ActorEventKind::MessageSkipped { .. } => EventSeverity::Trace,
            ActorEventKind::BehaviorReplaced => EventSeverity::Debug,
            ActorEventKind::ErrorOccurred { .. } => EventSeverity::Error,
            ActorEventKind::Stopped { .. } => EventSeverity::Info,
        }
    }
}

/// Specific types of actor events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ActorEventKind {
    /// Actor was spawned
    Spawned,

    /// Actor started execution
    Started,

    /// Actor dequeued a message and matched it against its current behavior
    MessageReceived {
        /// Message type name
        message_type: String,
    },

    /// Actor finished running a matched handler
    MessageProcessed {
        /// Message type name
        message_type: String,
        /// Processing duration in microseconds
        duration_micros: u64,
    },

    /// No clause of the current behavior matched; the message moved to the
    /// skip buffer for replay after the next `become` (spec.md §4.1).
    MessageSkipped {
        /// Message type name
        message_type: String,
    },

    /// `become` installed a new behavior.
    BehaviorReplaced,

    /// Error occurred during actor execution
    ErrorOccurred {
        /// Error message
        error: String,
    },

    /// Actor exited (spec.md §4.3)
    Stopped {
        /// The exit reason's wire code
        reason_code: u32,
    },
}

// ============================================================================
// System Events
// ============================================================================

/// Events related to runtime-wide bootstrap and shutdown (spec.md §5, §9).
#[derive(Debug, Clone, Serialize)]
pub struct SystemEvent {
    /// Timestamp when event occurred (§3.2 chrono DateTime<Utc>)
    pub timestamp: DateTime<Utc>,

    /// Specific system event type
    pub event_kind: SystemEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for SystemEvent {
    const EVENT_TYPE: &'static str = "system";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            SystemEventKind::Started => EventSeverity::Info,
            SystemEventKind::ShuttingDown => EventSeverity::Info,
            SystemEventKind::ActorRegistered { .. } => EventSeverity::Debug,
            SystemEventKind::ActorDeregistered { .. } => EventSeverity::Debug,
            SystemEventKind::ConfigurationChanged => EventSeverity::Info,
        }
    }
}

/// Specific types of system events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SystemEventKind {
    /// Runtime singletons (scheduler, atom table) have been created
    Started,

    /// `shutdown()` was called and is waiting for actors to exit
    ShuttingDown,

    /// An actor was inserted into the scheduler's registry
    ActorRegistered {
        /// ID of the registered actor
        actor_id: ActorId,
    },

    /// An actor was removed from the scheduler's registry after exiting
    ActorDeregistered {
        /// ID of the deregistered actor
        actor_id: ActorId,
    },

    /// `SystemConfig` was replaced or re-validated
    ConfigurationChanged,
}

// ============================================================================
// Transport Events
// ============================================================================

/// Events related to the network transport (spec.md §4.7, §7).
#[derive(Debug, Clone, Serialize)]
pub struct TransportEvent {
    /// Timestamp when event occurred
    pub timestamp: DateTime<Utc>,

    /// Specific transport event type
    pub event_kind: TransportEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for TransportEvent {
    const EVENT_TYPE: &'static str = "transport";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            TransportEventKind::Published { .. } => EventSeverity::Info,
            TransportEventKind::BindFailure { .. } => EventSeverity::Warning,
            TransportEventKind::Connected { .. } => EventSeverity::Info,
            TransportEventKind::ConnectionReused { .. } => EventSeverity::Debug,
            TransportEventKind::ConnectionLost { .. } => EventSeverity::Warning,
            TransportEventKind::LookupFailed { .. } => EventSeverity::Warning,
        }
    }
}

/// Specific types of transport events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum TransportEventKind {
    /// A listener was bound for `publish`
    Published {
        /// The address it bound
        address: String,
    },

    /// A bind attempt failed (spec.md §8 scenario S5)
    BindFailure {
        /// The address that was attempted
        address: String,
    },

    /// A new outbound connection was established
    Connected {
        /// The peer's node id, formatted
        node: String,
    },

    /// `remote_actor` reused an existing connection (spec.md §4.7's
    /// idempotent identity)
    ConnectionReused {
        /// The peer's node id, formatted
        node: String,
    },

    /// A connection was lost; DOWN(connection_lost) is being delivered to
    /// its monitors
    ConnectionLost {
        /// The peer's node id, formatted
        node: String,
    },

    /// `remote_actor` resolved to no published actor
    LookupFailed {
        /// The address that was queried
        address: String,
    },
}

// ============================================================================
// Sync-request events
// ============================================================================

/// Events related to `sync_send` round trips (spec.md §4.5).
#[derive(Debug, Clone, Serialize)]
pub struct SyncEvent {
    /// Timestamp when event occurred
    pub timestamp: DateTime<Utc>,

    /// ID of the actor that issued or resolved the request
    pub actor_id: ActorId,

    /// Specific sync-request event type
    pub event_kind: SyncEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for SyncEvent {
    const EVENT_TYPE: &'static str = "sync";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            SyncEventKind::Sent { .. } => EventSeverity::Trace,
            SyncEventKind::Replied { .. } => EventSeverity::Trace,
            SyncEventKind::Forwarded { .. } => EventSeverity::Debug,
            SyncEventKind::TimedOut { .. } => EventSeverity::Warning,
        }
    }
}

/// Specific types of sync-request events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SyncEventKind {
    /// `sync_send` allocated a request id and enqueued the request
    Sent {
        /// The allocated request id, as a raw integer
        request_id: u64,
    },
    /// A response matched its pending continuation
    Replied {
        /// The request id it resolved
        request_id: u64,
    },
    /// `forward_to` re-addressed the pending request
    Forwarded {
        /// The request id being forwarded
        request_id: u64,
    },
    /// The request's deadline elapsed before any response matched
    TimedOut {
        /// The request id that expired
        request_id: u64,
    },
}

// ============================================================================
// Group multicast events
// ============================================================================

/// Events related to the group multicast subsystem (spec.md §4.6).
#[derive(Debug, Clone, Serialize)]
pub struct GroupEvent {
    /// Timestamp when event occurred
    pub timestamp: DateTime<Utc>,

    /// Specific group event type
    pub event_kind: GroupEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for GroupEvent {
    const EVENT_TYPE: &'static str = "group";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            GroupEventKind::Subscribed { .. } => EventSeverity::Debug,
            GroupEventKind::Unsubscribed { .. } => EventSeverity::Debug,
            GroupEventKind::Published { .. } => EventSeverity::Trace,
        }
    }
}

/// Specific types of group events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum GroupEventKind {
    /// An actor subscribed to a group
    Subscribed {
        /// `module:name`
        group: String,
    },
    /// An actor unsubscribed from a group (including implicitly, on exit)
    Unsubscribed {
        /// `module:name`
        group: String,
    },
    /// A message was multicast to a group's members
    Published {
        /// `module:name`
        group: String,
        /// Number of members the message was delivered to
        member_count: usize,
    },
}

// ============================================================================
// Mailbox Events
// ============================================================================

/// Events related to mailbox operations (spec.md §4.2).
#[derive(Debug, Clone, Serialize)]
pub struct MailboxEvent {
    /// Timestamp when event occurred (§3.2 chrono DateTime<Utc>)
    pub timestamp: DateTime<Utc>,

    /// ID of the actor owning the mailbox
    pub actor_id: ActorId,

    /// Specific mailbox event type
    pub event_kind: MailboxEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for MailboxEvent {
    const EVENT_TYPE: &'static str = "mailbox";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            MailboxEventKind::MessageEnqueued { .. } => EventSeverity::Trace,
            MailboxEventKind::MessageDequeued { .. } => EventSeverity::Trace,
            MailboxEventKind::Closed => EventSeverity::Debug,
            MailboxEventKind::MessageBounced { .. } => EventSeverity::Warning,
        }
    }
}

/// Specific types of mailbox events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum MailboxEventKind {
    /// Message enqueued in mailbox
    MessageEnqueued {
        /// Current queue size
        queue_size: usize,
    },

    /// Message dequeued from mailbox
    MessageDequeued {
        /// Remaining queue size
        queue_size: usize,
    },

    /// The mailbox was closed after its owner exited (spec.md §4.2)
    Closed,

    /// A sync request arriving at a closed mailbox was bounced back to its
    /// sender as a synthesized error response (spec.md §4.2)
    MessageBounced {
        /// Why the message could not be delivered
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitoring_config_default() {
        let config = MonitoringConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_history_size, 1000);
        assert_eq!(config.severity_filter, EventSeverity::Info);
        assert_eq!(config.snapshot_interval, Duration::from_secs(60));
    }

    #[test]
    fn actor_event_severities_match_kind() {
        let base = ActorEvent {
            timestamp: Utc::now(),
            actor_id: ActorId::next(),
            event_kind: ActorEventKind::Spawned,
            metadata: HashMap::new(),
        };
        assert_eq!(base.severity(), EventSeverity::Debug);

        let skipped = ActorEvent {
            event_kind: ActorEventKind::MessageSkipped {
                message_type: "test".into(),
            },
            ..base.clone()
        };
        assert_eq!(skipped.severity(), EventSeverity::Trace);

        let stopped = ActorEvent {
            event_kind: ActorEventKind::Stopped { reason_code: 0 },
            ..base
        };
        assert_eq!(stopped.severity(), EventSeverity::Info);
    }

    #[test]
    fn transport_event_severities_match_kind() {
        let event = TransportEvent {
            timestamp: Utc::now(),
            event_kind: TransportEventKind::ConnectionLost {
                node: "node".into(),
            },
            metadata: HashMap::new(),
        };
        assert_eq!(event.severity(), EventSeverity::Warning);
    }

    #[test]
    fn sync_event_timeout_is_a_warning() {
        let event = SyncEvent {
            timestamp: Utc::now(),
            actor_id: ActorId::next(),
            event_kind: SyncEventKind::TimedOut { request_id: 1 },
            metadata: HashMap::new(),
        };
        assert_eq!(event.severity(), EventSeverity::Warning);
    }

    #[test]
    fn group_published_carries_member_count() {
        let event = GroupEvent {
            timestamp: Utc::now(),
            event_kind: GroupEventKind::Published {
                group: "local:foobar".into(),
                member_count: 7,
            },
            metadata: HashMap::new(),
        };
        match event.event_kind {
            GroupEventKind::Published { member_count, .. } => assert_eq!(member_count, 7),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn mailbox_event_bounced_is_a_warning() {
        let event = MailboxEvent {
            timestamp: Utc::now(),
            actor_id: ActorId::next(),
            event_kind: MailboxEventKind::MessageBounced {
                reason: "mailbox closed".into(),
            },
            metadata: HashMap::new(),
        };
        assert_eq!(event.severity(), EventSeverity::Warning);
    }
}
