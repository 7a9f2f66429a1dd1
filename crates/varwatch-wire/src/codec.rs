use std::fmt::Write as _;

use bytes::{BufMut, BytesMut};

use crate::error::{Result, WireError};
use crate::tags::TypeTag;

/// Opens every frame, in both directions.
pub const STREAM_START: u8 = b'<';

/// Closes every frame, in both directions.
pub const STREAM_END: u8 = b'>';

/// Separates fields within one record.
pub const FIELD_SEP: u8 = b':';

/// Separates records within one outbound frame.
pub const RECORD_SEP: u8 = b';';

/// Marks a spacer row; doubles as the spacer's type tag.
pub const SPACER_SENTINEL: u8 = b'~';

/// The characters that can never appear in a transmitted name or value.
pub const RESERVED: [u8; 3] = [FIELD_SEP, RECORD_SEP, SPACER_SENTINEL];

/// Emitted in place of a name that contains a reserved character.
pub const INVALID_NAME_PLACEHOLDER: &str = "#invalid#";

/// One parsed inbound edit: `<TAG:INDEX:VALUE>` with the markers stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit<'a> {
    pub tag: TypeTag,
    pub index: usize,
    pub value: &'a str,
}

/// Write the frame start marker.
pub fn encode_stream_start(dst: &mut BytesMut) {
    dst.put_u8(STREAM_START);
}

/// Write the frame end marker.
pub fn encode_stream_end(dst: &mut BytesMut) {
    dst.put_u8(STREAM_END);
}

/// Encode one outbound slot record.
///
/// ```text
/// INDEX : TAG : NAME : VALUE : READONLY ;
/// ```
///
/// `value` is `None` for a slot whose current content is unsafe to frame;
/// the field is left empty so the host still sees a record with the full
/// field count.
pub fn encode_record(
    dst: &mut BytesMut,
    index: usize,
    tag: TypeTag,
    name: &str,
    value: Option<&str>,
    readonly: bool,
) {
    let _ = write!(dst, "{index}");
    dst.put_u8(FIELD_SEP);
    dst.put_u8(tag.code());
    dst.put_u8(FIELD_SEP);
    dst.put_slice(name.as_bytes());
    dst.put_u8(FIELD_SEP);
    if let Some(value) = value {
        dst.put_slice(value.as_bytes());
    }
    dst.put_u8(FIELD_SEP);
    dst.put_u8(if readonly { b'1' } else { b'0' });
    dst.put_u8(RECORD_SEP);
}

/// Encode one fault code record for the frame tail.
pub fn encode_fault_code(dst: &mut BytesMut, code: &str) {
    dst.put_slice(code.as_bytes());
    dst.put_u8(RECORD_SEP);
}

/// Parse a complete inbound frame body (markers already stripped).
///
/// The body must split on the field separator into exactly three tokens:
/// a single-character type tag, an unsigned slot index, and the value text
/// (which may be empty).
pub fn parse_edit(frame: &[u8]) -> Result<Edit<'_>> {
    let text = std::str::from_utf8(frame).map_err(|_| WireError::NotUtf8)?;

    let mut fields = text.splitn(3, FIELD_SEP as char);
    let tag_field = fields.next().unwrap_or_default();
    let index_field = fields.next().ok_or(WireError::MissingField("index"))?;
    let value = fields.next().ok_or(WireError::MissingField("value"))?;

    if tag_field.len() != 1 {
        return Err(WireError::MalformedTag(tag_field.to_string()));
    }
    let code = tag_field.as_bytes()[0];
    let tag = TypeTag::from_code(code).ok_or(WireError::UnknownTypeTag(code as char))?;

    let index = index_field
        .parse::<usize>()
        .map_err(|_| WireError::BadIndex(index_field.to_string()))?;

    Ok(Edit { tag, index, value })
}
