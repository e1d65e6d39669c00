//! Top-level error type (spec.md §7).
//!
//! Per spec.md §7's propagation policy, the runtime never unwinds user code
//! across message boundaries: almost every fault in this crate surfaces as
//! a `DOWN` message or a link-propagated kill instead of a `Result`.
//! [`RuntimeError`] exists for the handful of operations spec.md explicitly
//! calls out as direct-call failures — `publish`, `remote_actor` — plus the
//! bootstrap-time failures ([`SystemConfig::validate`](crate::system::SystemConfig::validate))
//! that have no actor to notify yet.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::transport::TransportError;
use crate::util::ActorId;

#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Wraps every transport-level failure raised directly to a caller
    /// (`BindFailure`, `ConnectionLost`, `DecodeError`). `UnknownActor`
    /// (spec.md §7) is deliberately not one of these: `remote_actor`
    /// returns `Ok` with a dead [`crate::actor::ActorRef`] for that case
    /// instead of an error (spec.md §4.8, §7).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// `SystemConfig::validate` rejected a configuration value.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The runtime is past `shutdown()` and refusing new spawns (spec.md
    /// §4.4).
    #[error("system is shutting down")]
    ShuttingDown,

    /// `spawn` would exceed `SystemConfig::max_actors`.
    #[error("actor limit exceeded: current {current}, max {max}")]
    ActorLimitExceeded { current: usize, max: usize },

    /// A lookup against the local registry found nothing for `actor_id`.
    #[error("actor not found: {0}")]
    ActorNotFound(ActorId),
}

impl RuntimeError {
    /// Whether retrying the same call might succeed (spec.md §7,
    /// scenario S5's bind-and-retry loop).
    pub fn is_recoverable(&self) -> bool {
        match self {
            RuntimeError::Transport(err) => err.is_recoverable(),
            RuntimeError::ActorLimitExceeded { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_limit_exceeded_is_recoverable() {
        let err = RuntimeError::ActorLimitExceeded {
            current: 10,
            max: 5,
        };
        assert!(err.is_recoverable());
    }

    #[test]
    fn shutting_down_is_not_recoverable() {
        assert!(!RuntimeError::ShuttingDown.is_recoverable());
    }

    #[test]
    fn configuration_error_message_round_trips() {
        let err = RuntimeError::Configuration("max_actors must be positive".into());
        assert!(err.to_string().contains("max_actors"));
    }

    #[test]
    fn transport_error_wraps_and_forwards_recoverability() {
        let err: RuntimeError = TransportError::BindFailure {
            address: "127.0.0.1:4242".parse().expect("valid addr"),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        }
        .into();
        assert!(err.is_recoverable());
    }
}
