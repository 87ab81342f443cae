//! Socket transport helpers for the control-socket client.
//!
//! Encapsulates dialing the daemon's unix socket so the session logic stays
//! focused on the command/response exchange. The dial applies an explicit
//! connect deadline, and the configured read timeout is installed on the
//! stream before it is handed to the session.

use std::io;
use std::os::unix::net::UnixStream;

use socket2::{Domain, SockAddr, Socket, Type};

use crate::config::ControlSocket;
use crate::error::ControlError;

/// Opens a stream to the daemon's control socket.
pub(crate) fn dial(socket: &ControlSocket) -> Result<UnixStream, ControlError> {
    connect_unix(socket).map_err(|source| ControlError::Connect {
        socket: socket.to_string(),
        source,
    })
}

fn connect_unix(config: &ControlSocket) -> io::Result<UnixStream> {
    let socket = Socket::new(Domain::UNIX, Type::STREAM, None)?;
    let address = SockAddr::unix(config.path.as_str())?;
    socket.connect_timeout(&address, config.connect_timeout)?;
    let stream: UnixStream = socket.into();
    stream.set_read_timeout(config.read_timeout)?;
    Ok(stream)
}
