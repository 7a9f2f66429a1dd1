//! Bounded, address-stable table of watched variable slots.
//!
//! Callers register shared handles to their own values once per control-loop
//! tick; the first pass assigns each a dense, stable index, and every pass
//! after that only re-checks the content of the kinds that can change under
//! the caller's feet. The registry never owns the watched memory — it holds
//! clones of `Rc` handles, so the caller keeps reading and writing its value
//! directly while the protocol reads it out and writes edits back in.

pub mod config;
pub mod error;
pub mod faults;
pub mod registry;
pub mod slot;

pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use faults::{Fault, FaultSet};
pub use registry::Registry;
pub use slot::{Slot, Storage};
