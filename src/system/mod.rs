//! Process-wide configuration and bootstrap/shutdown for the runtime.

pub mod config;
pub mod errors;

// Re-exports
pub use config::{
    SystemConfig, DEFAULT_BIND_RETRY_ATTEMPTS, DEFAULT_ENABLE_METRICS, DEFAULT_MAILBOX_CAPACITY,
    DEFAULT_MAX_ACTORS, DEFAULT_SHUTDOWN_TIMEOUT, DEFAULT_SPAWN_TIMEOUT, DEFAULT_WORKER_COUNT,
};
pub use errors::RuntimeError;

/// Block until every locally registered actor other than the caller has
/// exited (spec.md §4.4's `await_all_others_done()`).
///
/// `excluding` is the caller's own id when called from inside a handler;
/// pass any id that was never spawned (e.g. one obtained before any
/// `spawn` call) when calling from outside an actor.
pub async fn await_all_others_done(excluding: crate::util::ActorId) {
    crate::scheduler::await_all_others_done(excluding).await;
}

/// Refuse new spawns and wait for every registered actor to exit (spec.md
/// §4.4's `shutdown()`).
pub async fn shutdown() {
    crate::scheduler::shutdown().await;
}
