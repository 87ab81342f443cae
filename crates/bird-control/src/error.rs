//! Error types for the control-socket client.

use std::io;

use thiserror::Error;

use crate::command::ProtocolAction;

/// Errors reported by the control-socket client.
///
/// Transport errors (`Connect`, `Greeting`, `SendCommand`, `ReadResponse`,
/// `Close`) leave the session's usability undefined; the caller decides
/// whether to construct a new one. `ProtocolOperation` is a daemon-level
/// rejection over a healthy transport, so the session remains usable.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The control socket could not be dialed.
    #[error("failed to connect to BIRD at {socket}: {source}")]
    Connect { socket: String, source: io::Error },
    /// The daemon's greeting could not be read after connecting.
    #[error("failed to read greeting from BIRD at {socket}: {source}")]
    Greeting { socket: String, source: io::Error },
    /// A command could not be written to the established session.
    #[error("failed to send command to BIRD: {0}")]
    SendCommand(io::Error),
    /// No complete response line was obtained for a command.
    #[error("failed to read response from BIRD: {0}")]
    ReadResponse(io::Error),
    /// The daemon answered, but not with a recognised success reply.
    #[error("failed to {action} protocol '{protocol}': {response}")]
    ProtocolOperation {
        action: ProtocolAction,
        protocol: String,
        response: String,
    },
    /// The session could not be shut down cleanly.
    #[error("failed to close the BIRD session: {0}")]
    Close(io::Error),
}

impl ControlError {
    /// Determines whether the error indicates no daemon is listening.
    ///
    /// Returns true for connection-refused, socket-not-found, and
    /// address-unavailable dial failures, which typically mean the daemon
    /// process is not running rather than a fault in the exchange.
    #[must_use]
    pub fn indicates_daemon_unavailable(&self) -> bool {
        match self {
            Self::Connect { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::NotFound
                    | io::ErrorKind::AddrNotAvailable
            ),
            _ => false,
        }
    }
}
