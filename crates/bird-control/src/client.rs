//! Session management for the BIRD control socket.
//!
//! A [`BirdClient`] owns exactly one connection to the daemon. The reader and
//! writer are two facets of that single stream, guarded together by one lock
//! held across the full write-then-read cycle so concurrent callers are
//! strictly serialised and never observe each other's replies.

use std::io::{self, BufRead, BufReader, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, trace, warn};

use crate::command::ProtocolAction;
use crate::config::ControlSocket;
use crate::error::ControlError;
use crate::transport;

const CLIENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::client");

/// Client session for the BIRD control socket.
///
/// Cheap to share across threads behind an `Arc`; every operation takes
/// `&self` and serialises on the internal wire lock. Once a transport error
/// is returned the session's usability is undefined and the owner should
/// construct a new one — there is no reconnection path.
#[derive(Debug)]
pub struct BirdClient {
    socket: ControlSocket,
    wire: Mutex<BufReader<UnixStream>>,
}

impl BirdClient {
    /// Connects to the daemon and drains its greeting.
    ///
    /// BIRD emits a `0001 BIRD <version> ready.` line immediately on
    /// connect. The greeting is consumed as one complete line, never
    /// parsed, so it cannot corrupt the framing of the first command's
    /// reply.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Connect`] when the socket cannot be dialed
    /// and [`ControlError::Greeting`] when the daemon hangs up before its
    /// greeting arrives. No retry is attempted.
    pub fn connect(socket: ControlSocket) -> Result<Self, ControlError> {
        let stream = transport::dial(&socket)?;
        let mut wire = BufReader::new(stream);
        if let Err(source) = read_wire_line(&mut wire) {
            return Err(ControlError::Greeting {
                socket: socket.to_string(),
                source,
            });
        }
        debug!(target: CLIENT_TARGET, socket = %socket, "connected to BIRD");
        Ok(Self {
            socket,
            wire: Mutex::new(wire),
        })
    }

    /// Enables the named routing-protocol instance.
    ///
    /// Enabling a protocol that is already enabled is reported as success.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from the exchange and returns
    /// [`ControlError::ProtocolOperation`] when the daemon's reply matches
    /// neither `"<name>: enabled"` nor `"<name>: already enabled"`.
    pub fn enable_protocol(&self, protocol: &str) -> Result<(), ControlError> {
        self.toggle_protocol(ProtocolAction::Enable, protocol)
    }

    /// Disables the named routing-protocol instance.
    ///
    /// Disabling a protocol that is already disabled is reported as success.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from the exchange and returns
    /// [`ControlError::ProtocolOperation`] when the daemon's reply matches
    /// neither `"<name>: disabled"` nor `"<name>: already disabled"`.
    pub fn disable_protocol(&self, protocol: &str) -> Result<(), ControlError> {
        self.toggle_protocol(ProtocolAction::Disable, protocol)
    }

    /// Shuts the session down in both directions.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Close`] when the stream cannot be shut down.
    pub fn close(self) -> Result<(), ControlError> {
        let Self { socket, wire } = self;
        let wire = wire.into_inner().unwrap_or_else(PoisonError::into_inner);
        wire.get_ref()
            .shutdown(Shutdown::Both)
            .map_err(ControlError::Close)?;
        debug!(target: CLIENT_TARGET, socket = %socket, "closed BIRD session");
        Ok(())
    }

    /// Settings this session was opened with.
    #[must_use]
    pub fn socket(&self) -> &ControlSocket {
        &self.socket
    }

    fn toggle_protocol(
        &self,
        action: ProtocolAction,
        protocol: &str,
    ) -> Result<(), ControlError> {
        let reply = self.exec(&action.command_line(protocol))?;
        if action.reply_reports_success(protocol, &reply) {
            return Ok(());
        }
        warn!(
            target: CLIENT_TARGET,
            protocol,
            reply = %reply,
            "daemon rejected protocol command"
        );
        Err(ControlError::ProtocolOperation {
            action,
            protocol: protocol.to_owned(),
            response: reply,
        })
    }

    /// Sends one newline-terminated command and returns the daemon's single
    /// reply line with its terminator stripped.
    ///
    /// The wire lock is held for the whole exchange and released on every
    /// exit path, so queued callers each complete a full cycle before the
    /// next begins. Queue order is unspecified.
    fn exec(&self, command: &str) -> Result<String, ControlError> {
        let mut wire = self.wire.lock().unwrap_or_else(PoisonError::into_inner);
        wire.get_mut()
            .write_all(command.as_bytes())
            .map_err(ControlError::SendCommand)?;
        wire.get_mut().flush().map_err(ControlError::SendCommand)?;
        let reply = read_wire_line(&mut wire).map_err(ControlError::ReadResponse)?;
        trace!(
            target: CLIENT_TARGET,
            command = command.trim_end(),
            reply = %reply,
            "completed exchange"
        );
        Ok(reply)
    }
}

/// Reads one complete line from the wire, stripping the terminator.
///
/// End-of-stream before a terminator arrives is an error: a partial line
/// means the daemon hung up mid-reply and the response cannot be trusted.
fn read_wire_line(wire: &mut BufReader<UnixStream>) -> io::Result<String> {
    let mut line = String::new();
    let read = wire.read_line(&mut line)?;
    if read == 0 || !line.ends_with('\n') {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "daemon closed the connection before a full line arrived",
        ));
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}
