//! Exit reasons: the terminal value every actor carries exactly once.

// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// Why an actor stopped.
///
/// Reserved values mirror spec.md §4.3; [`ExitReason::UserDefined`] and
/// [`ExitReason::Custom`] are the two ways application code supplies its
/// own reason to [`crate::actor::ActorContext::quit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    /// Clean, voluntary shutdown.
    Normal,
    /// `handle_message` returned an error or panicked.
    UnhandledException,
    /// `quit(exit_reason::user_defined())` with no further detail.
    UserDefined,
    /// A `sync_send` continuation never resolved before its deadline.
    SyncTimeout,
    /// The remote connection backing a [`crate::actor::ActorRef::Remote`] was lost.
    ConnectionLost,
    /// A `remote_actor` lookup targeted an actor that was never published.
    NoSuchActor,
    /// A linked peer exited abnormally and propagated its reason here.
    Killed,
    /// An application-specific reason carried as a raw code, for callers
    /// that need more than the built-in vocabulary.
    Custom(u32),
}

impl ExitReason {
    /// The wire code for this reason (spec.md §6's `u32` exit codes).
    pub fn code(&self) -> u32 {
        match self {
            ExitReason::Normal => 0,
            ExitReason::UnhandledException => 1,
            ExitReason::UserDefined => 2,
            ExitReason::SyncTimeout => 3,
            ExitReason::ConnectionLost => 4,
            ExitReason::NoSuchActor => 5,
            ExitReason::Killed => 6,
            ExitReason::Custom(code) => *code,
        }
    }

    pub fn from_code(code: u32) -> Self {
        match code {
            0 => ExitReason::Normal,
            1 => ExitReason::UnhandledException,
            2 => ExitReason::UserDefined,
            3 => ExitReason::SyncTimeout,
            4 => ExitReason::ConnectionLost,
            5 => ExitReason::NoSuchActor,
            6 => ExitReason::Killed,
            other => ExitReason::Custom(other),
        }
    }

    /// Whether link peers should be killed when this reason propagates.
    pub fn is_abnormal(&self) -> bool {
        !matches!(self, ExitReason::Normal)
    }
}

impl Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Normal => write!(f, "normal"),
            ExitReason::UnhandledException => write!(f, "unhandled_exception"),
            ExitReason::UserDefined => write!(f, "user_defined"),
            ExitReason::SyncTimeout => write!(f, "sync_timeout"),
            ExitReason::ConnectionLost => write!(f, "connection_lost"),
            ExitReason::NoSuchActor => write!(f, "no_such_actor"),
            ExitReason::Killed => write!(f, "killed"),
            ExitReason::Custom(code) => write!(f, "custom({code})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_is_the_only_non_abnormal_reason() {
        assert!(!ExitReason::Normal.is_abnormal());
        assert!(ExitReason::UnhandledException.is_abnormal());
        assert!(ExitReason::UserDefined.is_abnormal());
    }

    #[test]
    fn code_round_trips() {
        for reason in [
            ExitReason::Normal,
            ExitReason::UnhandledException,
            ExitReason::UserDefined,
            ExitReason::SyncTimeout,
            ExitReason::ConnectionLost,
            ExitReason::NoSuchActor,
            ExitReason::Killed,
        ] {
            assert_eq!(ExitReason::from_code(reason.code()), reason);
        }
    }

    #[test]
    fn unknown_code_becomes_custom() {
        assert_eq!(ExitReason::from_code(42), ExitReason::Custom(42));
    }
}
