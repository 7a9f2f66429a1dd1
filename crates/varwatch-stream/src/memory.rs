use std::cell::RefCell;
use std::rc::Rc;

use bytes::{Buf, BytesMut};

use crate::error::{Result, StreamError};
use crate::traits::ByteStream;

/// One end of an in-memory duplex byte pipe.
///
/// [`MemoryStream::pair`] returns two connected ends: bytes written to one
/// become readable on the other. Single-threaded by design (the protocol is
/// serviced from one control loop), hence `Rc` rather than `Arc`.
pub struct MemoryStream {
    rx: Rc<RefCell<BytesMut>>,
    tx: Rc<RefCell<BytesMut>>,
}

impl MemoryStream {
    /// Create a connected pair of streams.
    pub fn pair() -> (MemoryStream, MemoryStream) {
        let a_to_b = Rc::new(RefCell::new(BytesMut::new()));
        let b_to_a = Rc::new(RefCell::new(BytesMut::new()));

        let a = MemoryStream {
            rx: Rc::clone(&b_to_a),
            tx: Rc::clone(&a_to_b),
        };
        let b = MemoryStream {
            rx: a_to_b,
            tx: b_to_a,
        };
        (a, b)
    }

    /// True when the peer end has been dropped.
    pub fn peer_gone(&self) -> bool {
        // Each direction buffer is held by exactly the two ends.
        Rc::strong_count(&self.tx) < 2
    }
}

impl ByteStream for MemoryStream {
    fn bytes_available(&mut self) -> usize {
        self.rx.borrow().len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = self.rx.borrow_mut();
        if buf.is_empty() {
            None
        } else {
            Some(buf.get_u8())
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if self.peer_gone() {
            return Err(StreamError::Closed);
        }
        self.tx.borrow_mut().extend_from_slice(bytes);
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStream")
            .field("readable", &self.rx.borrow().len())
            .finish()
    }
}
