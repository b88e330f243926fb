use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The buffered bytes do not hold a complete reply yet
    #[error("incomplete reply")]
    IncompleteReply,
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("not connected")]
    NotConnected,
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    ParseFloat(#[from] std::num::ParseFloatError),
    #[error("end of stream error")]
    /// Attempting to extract a value failed due to the reply being fully consumed
    EndOfStream,
}

impl Error {
    /// Whether the error leaves the connection in an unknown state.
    ///
    /// Transport failures and malformed replies both mean the read position
    /// in the stream can no longer be trusted, so the session must be dropped.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Protocol(_))
    }
}
