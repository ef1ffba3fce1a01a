//! Accumulates bytes from a client until a full request head has arrived.

use std::fmt;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;

use crate::http::parser::{HEAD_TERMINATOR, find_head_end};

/// Default cap on the size of a request head
pub const DEFAULT_MAX_HEAD_BYTES: usize = 8192;

/// Default deadline for receiving a full request head
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounds applied while reading a request head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    /// Largest head accepted, terminator included.
    pub max_head_bytes: usize,
    /// Deadline for the whole head; `None` waits forever.
    pub read_timeout: Option<Duration>,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_head_bytes: DEFAULT_MAX_HEAD_BYTES,
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
        }
    }
}

#[derive(Debug)]
pub enum ReadError {
    /// Peer closed the stream before the blank line arrived.
    ConnectionClosed,
    HeadTooLarge { limit: usize },
    TimedOut,
    Io(std::io::Error),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::ConnectionClosed => {
                write!(f, "connection closed before request head was complete")
            }
            ReadError::HeadTooLarge { limit } => {
                write!(f, "request head exceeds {} bytes", limit)
            }
            ReadError::TimedOut => write!(f, "timed out waiting for request head"),
            ReadError::Io(e) => write!(f, "read failed: {}", e),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReadError {
    fn from(e: std::io::Error) -> Self {
        ReadError::Io(e)
    }
}

pub struct RequestReader {
    buffer: BytesMut,
    limits: ReadLimits,
}

impl RequestReader {
    pub fn new(limits: ReadLimits) -> Self {
        Self {
            buffer: BytesMut::with_capacity(1024),
            limits,
        }
    }

    /// Reads until `\r\n\r\n` has been seen and returns everything
    /// received so far, decoded as UTF-8 (invalid sequences replaced).
    pub async fn read_head<R>(&mut self, stream: &mut R) -> Result<String, ReadError>
    where
        R: AsyncRead + Unpin,
    {
        match self.limits.read_timeout {
            Some(deadline) => timeout(deadline, self.fill_head(stream))
                .await
                .map_err(|_| ReadError::TimedOut)??,
            None => self.fill_head(stream).await?,
        }

        Ok(String::from_utf8_lossy(&self.buffer).into_owned())
    }

    async fn fill_head<R>(&mut self, stream: &mut R) -> Result<(), ReadError>
    where
        R: AsyncRead + Unpin,
    {
        // Resume the terminator search just before the newest chunk
        let mut scanned = 0;

        let too_large = ReadError::HeadTooLarge {
            limit: self.limits.max_head_bytes,
        };

        loop {
            if let Some(pos) = find_head_end(&self.buffer[scanned..]) {
                // A single read can carry a whole oversized head
                let head_len = scanned + pos + HEAD_TERMINATOR.len();
                if head_len > self.limits.max_head_bytes {
                    return Err(too_large);
                }
                return Ok(());
            }
            scanned = self.buffer.len().saturating_sub(HEAD_TERMINATOR.len() - 1);

            if self.buffer.len() >= self.limits.max_head_bytes {
                return Err(too_large);
            }

            let n = stream.read_buf(&mut self.buffer).await?;
            if n == 0 {
                return Err(ReadError::ConnectionClosed);
            }
        }
    }
}
