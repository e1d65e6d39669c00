//! Sync-request tracking: the table-of-continuations behind `sync_send`
//! (spec.md §4.5, §9).
//!
//! `sync_send(...).then(...)` is not implemented as a suspendable
//! coroutine; it is a `request_id -> MatchExpression` table entry. This
//! keeps sync semantics independent of whether the actor is event-based
//! or blocking.

pub mod handle;
pub mod table;

pub use handle::RequestHandle;
pub use table::{PendingSync, SyncRequestTable};
