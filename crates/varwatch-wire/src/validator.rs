//! Reserved-character screening for names and values.

use crate::codec::RESERVED;

/// True when `text` can be framed without corrupting the stream.
///
/// A string is unsafe if it contains the record separator, the field
/// separator, or the spacer sentinel. Empty input is safe.
pub fn is_safe(text: &str) -> bool {
    !text.bytes().any(|b| RESERVED.contains(&b))
}

/// Single-character form of [`is_safe`].
pub fn is_safe_char(c: char) -> bool {
    !c.is_ascii() || !RESERVED.contains(&(c as u8))
}
