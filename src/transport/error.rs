//! Transport-level error taxonomy (spec.md §7).

// Layer 1: Standard library imports
use std::net::SocketAddr;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Errors raised directly to the caller of a transport operation.
///
/// Per spec.md §7's propagation policy, these are the only transport
/// faults that ever reach user code as a `Result`; everything else
/// (a dropped connection, a malformed frame arriving later) is instead
/// surfaced as a `DOWN` notification to monitors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// `publish`'s listener could not bind; the caller may retry with a
    /// different port (spec.md §7, scenario S5).
    #[error("failed to bind listener on {address}: {source}")]
    BindFailure {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The connection backing a `RemoteRef` was lost. Translated to
    /// `DOWN(reason = connection_lost)` for every local monitor before
    /// this variant would otherwise be surfaced.
    #[error("connection to {node} lost: {source}")]
    ConnectionLost {
        node: crate::util::NodeId,
        #[source]
        source: std::io::Error,
    },

    /// A frame failed to decode; the connection is closed and treated as
    /// [`TransportError::ConnectionLost`].
    #[error("failed to decode frame from {node}: {reason}")]
    DecodeError {
        node: crate::util::NodeId,
        reason: String,
    },
}

impl TransportError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TransportError::BindFailure { .. })
    }
}
