//! Blocking client for the editor service socket.

use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::codec::{read_message, write_message, DEFAULT_MAX_FRAME_BYTES};
use crate::message::{Command, Request, Specifier};
use crate::reply::Reply;

/// One connection to the service. Requests are answered strictly in order.
///
/// Requests are never retried: `Set` and `Execute` are not idempotent.
#[derive(Debug)]
pub struct Client {
    stream: UnixStream,
    max_frame_bytes: usize,
}

impl Client {
    /// Connects to the service listening at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be reached.
    pub fn connect(path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(path)
            .with_context(|| format!("failed to connect to {}", path.display()))?;
        Ok(Self {
            stream,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        })
    }

    /// Sets a read timeout for replies.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket option cannot be set.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self> {
        self.stream
            .set_read_timeout(Some(timeout))
            .context("failed to set read timeout")?;
        Ok(self)
    }

    /// Sets the largest frame this client sends or accepts.
    pub fn with_max_frame_bytes(mut self, max_frame_bytes: usize) -> Self {
        self.max_frame_bytes = max_frame_bytes;
        self
    }

    /// Sends `request` and waits for its reply.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure, when the connection closes before a
    /// reply, or when the reply matches none of the known reply shapes.
    pub fn send(&mut self, request: &Request) -> Result<Reply> {
        tracing::debug!("Sending {} {:?}", request.command, request.specifiers);
        write_message(&mut self.stream, request, self.max_frame_bytes)
            .context("failed to send request")?;
        read_message::<Reply, _>(&mut self.stream, self.max_frame_bytes)
            .context("failed to read reply")?
            .context("connection closed before a reply arrived")
    }

    /// `get <property>` on the selected editor.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub fn get(&mut self, property: Specifier) -> Result<Reply> {
        self.send(&Request::for_selected(Command::Get, property))
    }

    /// `set <property>` on the selected editor with `data`.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub fn set(&mut self, property: Specifier, data: impl Into<serde_json::Value>) -> Result<Reply> {
        self.send(&Request::for_selected(Command::Set, property).with_data(data))
    }

    /// `execute <property>` on the selected editor.
    ///
    /// # Errors
    ///
    /// See [`Client::send`].
    pub fn execute(&mut self, property: &str) -> Result<Reply> {
        self.send(&Request::for_selected(
            Command::Execute,
            Specifier::property(property),
        ))
    }
}
