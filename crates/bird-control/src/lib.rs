//! Client for the BIRD routing daemon's control socket.
//!
//! BIRD exposes a line-oriented administrative protocol over a unix domain
//! socket. [`BirdClient`] owns one connection to that socket, serialises
//! command/response exchanges across threads, and classifies the daemon's
//! free-text replies into success or failure for protocol enable/disable
//! operations. The protocol is strictly half-duplex: each command yields
//! exactly one reply line, and nothing else travels on the wire.

mod command;
mod config;
mod error;

#[cfg(unix)]
mod client;
#[cfg(unix)]
mod transport;

pub use command::ProtocolAction;
pub use config::{ControlSocket, DEFAULT_CONNECT_TIMEOUT};
pub use error::ControlError;

#[cfg(unix)]
pub use client::BirdClient;
