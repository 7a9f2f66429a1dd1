use std::io::{ErrorKind, Read, Write};

use bytes::{Buf, BytesMut};
use tracing::debug;

use crate::error::{Result, StreamError};
use crate::traits::ByteStream;

const READ_CHUNK_SIZE: usize = 256;

/// Adapts any `Read + Write` transport to the non-blocking [`ByteStream`]
/// contract.
///
/// The inner stream must be in non-blocking mode (or otherwise guaranteed
/// not to stall on read); `WouldBlock` is treated as "no bytes yet" and
/// `Interrupted` is retried. Outbound bytes that the transport cannot take
/// immediately are held in a pending buffer and retried on the next write.
pub struct IoStream<T> {
    inner: T,
    readable: BytesMut,
    pending: BytesMut,
    eof: bool,
}

impl<T: Read + Write> IoStream<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            readable: BytesMut::with_capacity(READ_CHUNK_SIZE),
            pending: BytesMut::new(),
            eof: false,
        }
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the adapter and return the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Bytes accepted by `write` but not yet taken by the transport.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn fill(&mut self) {
        if self.eof {
            return;
        }
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return;
                }
                Ok(n) => self.readable.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == ErrorKind::WouldBlock => return,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    debug!(%err, "read failed, treating stream as closed");
                    self.eof = true;
                    return;
                }
            }
        }
    }

    fn flush_pending(&mut self) -> Result<()> {
        while !self.pending.is_empty() {
            match self.inner.write(&self.pending) {
                Ok(0) => return Err(StreamError::Closed),
                Ok(n) => self.pending.advance(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => {
                    debug!(pending = self.pending.len(), "transport full, holding bytes");
                    return Ok(());
                }
                Err(err) => return Err(StreamError::Io(err)),
            }
        }
        match self.inner.flush() {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => Ok(()),
            Err(err) => Err(StreamError::Io(err)),
        }
    }
}

impl<T: Read + Write> ByteStream for IoStream<T> {
    fn bytes_available(&mut self) -> usize {
        self.fill();
        self.readable.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.readable.is_empty() {
            self.fill();
        }
        if self.readable.is_empty() {
            None
        } else {
            Some(self.readable.get_u8())
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.pending.extend_from_slice(bytes);
        self.flush_pending()
    }
}
