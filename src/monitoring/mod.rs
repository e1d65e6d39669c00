//! # Monitoring Module
//!
//! Universal monitoring infrastructure for observing and tracking events across all runtime components.
//!
//! ## Features
//! - **Generic Monitor<E> Trait**: Universal monitoring for any entity type
//! - **Zero-Cost Abstraction**: NoopMonitor compiles away when disabled
//! - **Lock-Free Recording**: Atomic counters for concurrent event tracking
//! - **Type Safety**: MonitoringEvent trait ensures compile-time correctness
//!
//! ## Event Types
//! - `ActorEvent`: actor lifecycle and message dispatch (spec.md §4.3, §4.4)
//! - `SystemEvent`: runtime bootstrap/shutdown and registry churn (§4.4, §9)
//! - `TransportEvent`: `publish`/`remote_actor` and connection lifecycle (§4.7, §7)
//! - `SyncEvent`: `sync_send` round trips (§4.5)
//! - `GroupEvent`: group subscribe/publish (§4.6)
//! - `MailboxEvent`: mailbox enqueue/dequeue/close (§4.2)
//!
//! ## Examples
//! ```rust,ignore
//! use haven_actors::monitoring::{InMemoryMonitor, MonitoringConfig, ActorEvent};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MonitoringConfig::default();
//! let monitor = InMemoryMonitor::new(config);
//!
//! // monitor.record(event).await?;
//! // let snapshot = monitor.snapshot().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod in_memory;
pub mod noop;
pub(crate) mod sink;
pub mod traits;
pub mod types;

pub use error::MonitoringError;
pub use in_memory::InMemoryMonitor;
pub use noop::NoopMonitor;
pub use sink::{actor_snapshot, is_enabled, set_enabled};
pub use traits::{EventSeverity, Monitor, MonitoringEvent};
pub use types::{
    ActorEvent, ActorEventKind, GroupEvent, GroupEventKind, MailboxEvent, MailboxEventKind,
    MonitoringConfig, MonitoringSnapshot, SyncEvent, SyncEventKind, SystemEvent, SystemEventKind,
    TransportEvent, TransportEventKind,
};
