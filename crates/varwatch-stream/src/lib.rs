//! Non-blocking byte-stream boundary for varwatch.
//!
//! The watch protocol is serviced from a cooperative control loop, so the
//! transport must never block: it reports how many bytes are ready, hands
//! them out one at a time, and accepts outbound bytes without stalling.
//!
//! This is the lowest layer of varwatch. Everything else builds on top of
//! the [`ByteStream`] trait provided here.

pub mod error;
pub mod io;
pub mod memory;
pub mod traits;

pub use error::{Result, StreamError};
pub use io::IoStream;
pub use memory::MemoryStream;
pub use traits::ByteStream;
