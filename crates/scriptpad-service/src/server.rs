//! Unix socket listener: one thread per connection, replies in request order.

use std::io;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result};
use scriptpad_protocol::{read_frame, write_message, FrameError, Reply, Request};

use crate::dispatch::Service;

/// A bound listening socket serving one [`Service`].
///
/// The socket file is removed when the server is dropped.
#[derive(Debug)]
pub struct Server {
    listener: UnixListener,
    path: PathBuf,
    service: Service,
    max_frame_bytes: usize,
}

impl Server {
    /// Binds `path`, replacing a stale socket file left by an earlier run.
    ///
    /// # Errors
    ///
    /// Returns an error if the stale file cannot be removed or the socket
    /// cannot be bound.
    pub fn bind(path: &Path, service: Service, max_frame_bytes: usize) -> Result<Self> {
        if path.exists() {
            tracing::info!("Removing stale socket {}", path.display());
            std::fs::remove_file(path)
                .with_context(|| format!("failed to remove stale socket {}", path.display()))?;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let listener = UnixListener::bind(path)
            .with_context(|| format!("failed to bind {}", path.display()))?;
        tracing::info!("Listening on {}", path.display());
        Ok(Self {
            listener,
            path: path.to_path_buf(),
            service,
            max_frame_bytes,
        })
    }

    /// Accepts connections until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns an error if `accept` itself fails.
    pub fn run(&self) -> Result<()> {
        let mut next_connection = 0u64;
        loop {
            let (stream, _) = self.listener.accept().context("failed to accept connection")?;
            next_connection += 1;
            let id = next_connection;
            let service = self.service.clone();
            let max_frame_bytes = self.max_frame_bytes;
            thread::Builder::new()
                .name(format!("scriptpad-conn-{id}"))
                .spawn(move || {
                    tracing::info!("Connection {id} opened");
                    match serve_connection(stream, &service, max_frame_bytes) {
                        Ok(served) => tracing::info!("Connection {id} closed after {served} requests"),
                        Err(e) => tracing::warn!("Connection {id} dropped: {e:#}"),
                    }
                })
                .context("failed to spawn connection thread")?;
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove socket {}: {e}", self.path.display());
            }
        }
    }
}

/// Serves one connection until the peer closes it. Returns the request count.
///
/// A body that is not a valid request gets a not-understood reply and the
/// connection stays open; framing errors end the connection.
///
/// # Errors
///
/// Returns an error on I/O failure or an oversized frame.
pub fn serve_connection(mut stream: UnixStream, service: &Service, max_frame_bytes: usize) -> Result<u64> {
    let mut served = 0u64;
    loop {
        let body = match read_frame(&mut stream, max_frame_bytes) {
            Ok(Some(body)) => body,
            Ok(None) => return Ok(served),
            Err(e @ FrameError::TooLarge { .. }) => return Err(e).context("rejected request frame"),
            Err(e) => return Err(e).context("failed to read request"),
        };
        let reply = match serde_json::from_slice::<Request>(&body) {
            Ok(request) => service.handle(&request),
            Err(e) => {
                tracing::debug!("Malformed request: {e}");
                Reply::not_understood(format!("malformed request: {e}"))
            }
        };
        write_message(&mut stream, &reply, max_frame_bytes).context("failed to write reply")?;
        served += 1;
    }
}
