/// Result alias that carries the custom [`TrackError`] type.
pub type Result<T> = std::result::Result<T, TrackError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    /// A caller passed a parameter no well-formed program would pass, such as
    /// a zero sampling density or a negative track width.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A persisted point file contained a line that is not three floats.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration file could not be decoded.
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
}

impl TrackError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn invalid<T: Into<String>>(msg: T) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<&str> for TrackError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for TrackError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
