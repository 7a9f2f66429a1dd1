use varwatch_stream::StreamError;

/// Errors that can stop a servicing tick.
///
/// Inbound protocol faults never appear here — malformed or unapplicable
/// edits are logged and discarded inside the tick.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `service` was called before `complete_first_pass`.
    #[error("servicing began before the first registration pass was completed")]
    FirstPassIncomplete,

    /// The outbound stream failed.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
