/// Errors that can occur on a byte stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The other side of the stream is gone.
    #[error("stream closed")]
    Closed,

    /// An I/O error occurred on the underlying transport.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StreamError>;
