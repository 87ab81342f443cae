//! Connection settings for the control socket.

use std::fmt;
use std::time::Duration;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Deadline applied when dialing the control socket unless overridden.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Declarative settings for a BIRD control socket.
///
/// The read timeout defaults to `None`, meaning a command blocks until the
/// daemon produces a full reply line. Callers that cannot tolerate a stalled
/// daemon should set an explicit deadline with
/// [`with_read_timeout`](Self::with_read_timeout).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ControlSocket {
    /// Filesystem path of the daemon's control socket.
    pub path: Utf8PathBuf,
    /// Deadline for establishing the connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,
    /// Deadline for each response read; `None` blocks indefinitely.
    #[serde(default)]
    pub read_timeout: Option<Duration>,
}

impl ControlSocket {
    /// Builds settings for the socket at `path` with default timeouts.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: None,
        }
    }

    /// Overrides the connect deadline.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Applies a deadline to each response read.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }
}

fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}

impl fmt::Display for ControlSocket {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "unix://{}", self.path)
    }
}
