//! Delimited record framing for the varwatch protocol.
//!
//! Outbound, the device describes every slot once per cycle:
//!
//! ```text
//! <0:L:count:3:0;1:f:temp:21.5:1;E2;>
//! ```
//!
//! `<` and `>` bracket one complete frame, `;` separates records, `:`
//! separates fields within a record, and `~` is the spacer sentinel (also
//! serving as the spacer's type tag). Those three delimiter characters are
//! reserved: they can never appear in a transmitted name or value.
//!
//! Inbound, the host sends one edit per frame: `<TAG:INDEX:VALUE>`.

pub mod codec;
pub mod error;
pub mod tags;
pub mod validator;

pub use codec::{
    encode_fault_code, encode_record, encode_stream_end, encode_stream_start, parse_edit, Edit,
    FIELD_SEP, INVALID_NAME_PLACEHOLDER, RECORD_SEP, RESERVED, SPACER_SENTINEL, STREAM_END,
    STREAM_START,
};
pub use error::{Result, WireError};
pub use tags::TypeTag;
pub use validator::{is_safe, is_safe_char};
