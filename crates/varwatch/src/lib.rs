//! Monitor and edit named device variables over a non-blocking byte stream.
//!
//! A constrained device registers shared handles to its in-memory values;
//! a host on the other end of the stream sees a named, typed table and can
//! write the non-read-only entries back. Everything is driven from the
//! device's own control loop, one bounded step per tick — the encoder never
//! emits more than its per-tick budget of records, and the decoder only
//! consumes the bytes that have already arrived. Nothing here blocks,
//! times out, or spawns.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use varwatch::{MemoryStream, WatchSession};
//!
//! let (device_end, _host_end) = MemoryStream::pair();
//! let mut session = WatchSession::new(device_end);
//!
//! let count = Rc::new(Cell::new(3u32));
//! session.register("count", &count, false).unwrap();
//! session.text("build 42").unwrap();
//! session.complete_first_pass();
//!
//! // One control-loop tick:
//! session.register("count", &count, false).unwrap();
//! session.text("build 42").unwrap();
//! session.service().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod rx;
pub mod session;
pub mod tx;

pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use rx::{RxDecoder, RxState};
pub use session::WatchSession;
pub use tx::{TxEncoder, TxPhase};

pub use varwatch_registry::{
    Fault, FaultSet, Registry, RegistryConfig, RegistryError, Slot, Storage,
};
pub use varwatch_stream::{ByteStream, IoStream, MemoryStream, StreamError};
pub use varwatch_wire::TypeTag;
