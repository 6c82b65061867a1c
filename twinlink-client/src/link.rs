//! Transport to the backend over its scene socket
//!
//! A [`Link`] is a connected Unix-domain stream with the read side buffered.
//! All reads go through the one buffer, so a line read never strands bytes
//! that a following fixed-length frame read needs.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

use twinlink_protocol::Request;
use twinlink_utils::{Result, TwinError};

/// Bidirectional byte stream to a single backend process
pub struct Link {
    stream: BufReader<UnixStream>,
    reply_timeout: Option<Duration>,
}

impl Link {
    /// Connect to the backend socket with bounded retry
    ///
    /// Sleeps `retry_delay` before each attempt so a freshly spawned backend
    /// has time to finish its own startup and create the socket. On
    /// exhausting all attempts nothing is left open and
    /// [`TwinError::Connect`] is returned.
    pub async fn connect(path: &Path, attempts: u32, retry_delay: Duration) -> Result<Self> {
        for attempt in 1..=attempts {
            tokio::time::sleep(retry_delay).await;

            match UnixStream::connect(path).await {
                Ok(stream) => {
                    tracing::debug!(attempt, path = %path.display(), "Connected to backend");
                    return Ok(Self {
                        stream: BufReader::new(stream),
                        reply_timeout: None,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        attempts,
                        path = %path.display(),
                        error = %e,
                        "Backend connect attempt failed"
                    );
                }
            }
        }

        Err(TwinError::Connect {
            path: path.to_path_buf(),
            attempts,
        })
    }

    /// Wrap an already connected stream (test servers, pre-opened sockets)
    pub(crate) fn from_stream(stream: UnixStream) -> Self {
        Self {
            stream: BufReader::new(stream),
            reply_timeout: None,
        }
    }

    /// Bound every reply read; `None` waits indefinitely
    pub fn set_reply_timeout(&mut self, timeout: Option<Duration>) {
        self.reply_timeout = timeout;
    }

    /// Write one request line
    pub async fn send(&mut self, request: &Request) -> Result<()> {
        let line = format!("{}\n", request);
        tracing::trace!(line = line.trim_end(), "-> backend");
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Read one reply line, without the trailing newline
    ///
    /// The line is returned verbatim; JSON interpretation is the caller's
    /// business.
    pub async fn read_text_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.stream.read_line(&mut line);
        let n = match self.reply_timeout {
            Some(timeout) => tokio::time::timeout(timeout, read)
                .await
                .map_err(|_| TwinError::ReplyTimeout { timeout })??,
            None => read.await?,
        };

        // EOF before any byte, or mid-line, means the peer went away
        if n == 0 || !line.ends_with('\n') {
            return Err(TwinError::ConnectionClosed);
        }
        line.pop();
        tracing::trace!(line = %line, "<- backend");
        Ok(line)
    }

    /// Read exactly `buf.len()` bytes of a binary frame
    ///
    /// The frame length is implied by context (viewport or camera image
    /// dimensions); there is no length prefix on the wire.
    pub async fn read_frame(&mut self, buf: &mut [u8]) -> Result<()> {
        let read = self.stream.read_exact(buf);
        let result = match self.reply_timeout {
            Some(timeout) => tokio::time::timeout(timeout, read)
                .await
                .map_err(|_| TwinError::ReplyTimeout { timeout })?,
            None => read.await,
        };

        result.map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                TwinError::ConnectionClosed
            } else {
                TwinError::Io(e)
            }
        })?;
        tracing::trace!(bytes = buf.len(), "<- backend frame");
        Ok(())
    }
}
