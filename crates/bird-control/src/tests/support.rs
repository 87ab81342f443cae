//! Fake BIRD daemon for exercising the client.
//!
//! Binds a unix listener in a temporary directory, accepts a single
//! connection, emits the greeting line, and answers each request line via a
//! scripted responder while recording the raw request lines for assertions.

use std::io::{self, BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use tempfile::TempDir;

use crate::config::ControlSocket;

const GREETING: &str = "0001 BIRD 2.0.8 ready.";
const ACCEPT_DEADLINE: Duration = Duration::from_secs(2);

/// Scripted reply to one request line.
pub(in crate::tests) enum Reply {
    /// Send the line, newline appended.
    Line(String),
    /// Drop the connection without answering.
    Hangup,
}

/// A mock daemon that accepts one connection and answers scripted replies.
pub(in crate::tests) struct FakeBird {
    socket_path: Utf8PathBuf,
    requests: Arc<Mutex<Vec<String>>>,
    result: Arc<Mutex<Option<Result<()>>>>,
    handle: Option<thread::JoinHandle<()>>,
    _dir: TempDir,
}

impl FakeBird {
    /// Spawns a daemon that greets and answers each request via `respond`.
    pub fn spawn<F>(respond: F) -> Result<Self>
    where
        F: FnMut(&str) -> Reply + Send + 'static,
    {
        Self::spawn_inner(true, respond)
    }

    /// Spawns a daemon that hangs up before sending any greeting.
    pub fn spawn_mute() -> Result<Self> {
        Self::spawn_inner(false, |_| Reply::Hangup)
    }

    /// Socket settings pointing at this daemon.
    pub fn control_socket(&self) -> ControlSocket {
        ControlSocket::new(self.socket_path.clone())
    }

    /// Waits for the daemon thread to complete and returns the raw request
    /// lines it recorded.
    pub fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake bird thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake bird result: {error}"))?
            .take()
        {
            outcome.context("fake bird failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn spawn_inner<F>(greet: bool, respond: F) -> Result<Self>
    where
        F: FnMut(&str) -> Reply + Send + 'static,
    {
        let dir = TempDir::new().context("create socket dir")?;
        let socket_path = Utf8PathBuf::from_path_buf(dir.path().join("bird.ctl"))
            .map_err(|path| anyhow!("socket dir is not utf8: {}", path.display()))?;
        let listener = UnixListener::bind(&socket_path).context("bind fake bird")?;
        listener
            .set_nonblocking(true)
            .context("fake bird nonblocking")?;
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));
        let requests_clone = Arc::clone(&requests);
        let result_clone = Arc::clone(&result);
        let handle = thread::spawn(move || {
            let outcome = serve_client(&listener, greet, respond, &requests_clone);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });
        Ok(Self {
            socket_path,
            requests,
            result,
            handle: Some(handle),
            _dir: dir,
        })
    }
}

impl Drop for FakeBird {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve_client<F>(
    listener: &UnixListener,
    greet: bool,
    mut respond: F,
    requests: &Arc<Mutex<Vec<String>>>,
) -> Result<()>
where
    F: FnMut(&str) -> Reply,
{
    let Some(stream) = accept_with_deadline(listener)? else {
        // No connection arrived; exit cleanly so tests that abort before
        // connecting do not hang on join.
        return Ok(());
    };
    if !greet {
        return Ok(());
    }
    let mut writer = stream.try_clone().context("clone stream")?;
    writeln!(writer, "{GREETING}").context("write greeting")?;
    writer.flush().context("flush greeting")?;
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).context("read request")? == 0 {
            return Ok(());
        }
        {
            let mut guard = requests
                .lock()
                .map_err(|error| anyhow!("lock requests: {error}"))?;
            guard.push(line.clone());
        }
        match respond(line.trim_end()) {
            Reply::Line(reply) => {
                writeln!(writer, "{reply}").context("write reply")?;
                writer.flush().context("flush reply")?;
            }
            Reply::Hangup => return Ok(()),
        }
    }
}

fn accept_with_deadline(listener: &UnixListener) -> Result<Option<UnixStream>> {
    let deadline = Instant::now() + ACCEPT_DEADLINE;
    loop {
        match listener.accept() {
            Ok((stream, _)) => {
                stream.set_nonblocking(false).context("stream blocking")?;
                return Ok(Some(stream));
            }
            Err(ref error)
                if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
            {
                thread::sleep(Duration::from_millis(10));
            }
            Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(None),
            Err(error) => return Err(error).context("accept connection"),
        }
    }
}
