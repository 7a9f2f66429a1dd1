use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use varwatch_registry::Registry;
use varwatch_stream::ByteStream;
use varwatch_wire::{parse_edit, STREAM_END, STREAM_START};

/// Decoder progress between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxState {
    /// Scanning for the start marker; everything else is discarded.
    Idle,
    /// Collecting frame body bytes until the end marker.
    Accumulating,
}

/// Incremental inbound decoder.
///
/// Consumes exactly the bytes the stream has ready each tick and makes
/// forward progress regardless of how the frames are chunked. The
/// accumulation buffer is a hard bound: a frame that outgrows it is
/// dropped whole and scanning restarts at the next start marker.
pub struct RxDecoder {
    state: RxState,
    buf: BytesMut,
    max_frame: usize,
}

impl RxDecoder {
    pub fn new(max_frame: usize) -> Self {
        Self {
            state: RxState::Idle,
            buf: BytesMut::with_capacity(max_frame),
            max_frame,
        }
    }

    pub fn state(&self) -> RxState {
        self.state
    }

    /// Drain whatever is currently available and apply any completed edits.
    pub fn service<S: ByteStream>(&mut self, registry: &Registry, stream: &mut S) {
        while let Some(byte) = stream.read_byte() {
            self.accept(byte, registry);
        }
    }

    fn accept(&mut self, byte: u8, registry: &Registry) {
        match self.state {
            RxState::Idle => {
                if byte == STREAM_START {
                    self.buf.clear();
                    self.state = RxState::Accumulating;
                }
            }
            RxState::Accumulating => {
                if byte == STREAM_END {
                    self.apply(registry);
                    self.buf.clear();
                    self.state = RxState::Idle;
                } else if self.buf.len() == self.max_frame {
                    debug!(limit = self.max_frame, "inbound frame exceeds buffer, dropped");
                    self.buf.clear();
                    self.state = RxState::Idle;
                } else {
                    self.buf.put_u8(byte);
                }
            }
        }
    }

    /// Parse the completed frame body and write the edit through.
    ///
    /// Every failure here is a discarded edit, never an interruption of
    /// the servicing loop.
    fn apply(&self, registry: &Registry) {
        match parse_edit(&self.buf) {
            Ok(edit) => match registry.apply_edit(edit) {
                Ok(()) => trace!(index = edit.index, "edit applied"),
                Err(err) => debug!(%err, "edit discarded"),
            },
            Err(err) => debug!(%err, "malformed inbound frame discarded"),
        }
    }
}
