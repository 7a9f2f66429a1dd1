/// Errors that can occur while parsing an inbound frame.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The frame body is not valid UTF-8.
    #[error("inbound frame is not valid UTF-8")]
    NotUtf8,

    /// The frame does not carry the expected three fields.
    #[error("inbound frame is missing the {0} field")]
    MissingField(&'static str),

    /// The type tag field is not a single character.
    #[error("malformed type tag field {0:?}")]
    MalformedTag(String),

    /// The type tag character is not one of the known codes.
    #[error("unknown type tag {0:?}")]
    UnknownTypeTag(char),

    /// The slot index field does not parse as an unsigned integer.
    #[error("unparseable slot index {0:?}")]
    BadIndex(String),
}

pub type Result<T> = std::result::Result<T, WireError>;
