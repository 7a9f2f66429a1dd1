use varwatch_registry::{Registry, RegistryConfig, RegistryError, Storage};
use varwatch_stream::ByteStream;

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::rx::RxDecoder;
use crate::tx::TxEncoder;

/// One watch endpoint: the registry plus both protocol state machines,
/// bound to a stream.
///
/// Drive it from the control loop, once per tick:
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use varwatch::{MemoryStream, WatchSession};
///
/// let (device_end, _host_end) = MemoryStream::pair();
/// let mut session = WatchSession::new(device_end);
/// let rpm = Rc::new(Cell::new(0u32));
///
/// session.register("rpm", &rpm, false).unwrap();
/// session.complete_first_pass();
///
/// loop {
///     session.register("rpm", &rpm, false).unwrap();
///     session.service().unwrap();
///     # break;
/// }
/// ```
pub struct WatchSession<S> {
    registry: Registry,
    tx: TxEncoder,
    rx: RxDecoder,
    stream: S,
}

impl<S: ByteStream> WatchSession<S> {
    /// Create a session with default configuration.
    pub fn new(stream: S) -> Self {
        Self::with_config(stream, SessionConfig::default())
    }

    /// Create a session with explicit configuration.
    pub fn with_config(stream: S, config: SessionConfig) -> Self {
        Self {
            registry: Registry::with_config(RegistryConfig {
                capacity: config.capacity,
            }),
            tx: TxEncoder::new(config.slots_per_tick),
            rx: RxDecoder::new(config.rx_buffer_size),
            stream,
        }
    }

    /// Register a watched value, or revalidate it after the first pass.
    ///
    /// Accepts anything convertible to [`Storage`] — most commonly a
    /// borrowed `Rc<Cell<T>>` handle the caller keeps for itself.
    pub fn register(
        &mut self,
        name: &str,
        storage: impl Into<Storage>,
        readonly: bool,
    ) -> std::result::Result<usize, RegistryError> {
        self.registry.register(name, storage.into(), readonly)
    }

    /// Register a fixed, display-only text row.
    pub fn text(&mut self, text: &str) -> std::result::Result<usize, RegistryError> {
        self.registry
            .register("", Storage::constant_text(text), true)
    }

    /// Register a display-only blank row.
    pub fn spacer(&mut self) -> std::result::Result<usize, RegistryError> {
        self.registry.register("", Storage::Spacer, true)
    }

    /// End the first registration pass. Idempotent; must precede the first
    /// [`service`](WatchSession::service) call.
    pub fn complete_first_pass(&mut self) {
        self.registry.complete_first_pass();
    }

    /// Run one tick: one bounded transmit step, then drain whatever
    /// inbound bytes are ready. Never blocks.
    pub fn service(&mut self) -> Result<()> {
        if !self.registry.first_pass_done() {
            return Err(SessionError::FirstPassIncomplete);
        }
        self.tx.service(&self.registry, &mut self.stream)?;
        self.rx.service(&self.registry, &mut self.stream);
        Ok(())
    }

    /// The slot table.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Consume the session and return the stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}
