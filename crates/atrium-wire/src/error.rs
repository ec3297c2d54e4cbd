//! Wire protocol error types.

/// Result type alias for wire operations.
pub type Result<T> = std::result::Result<T, WireError>;

/// Errors that can occur while framing, sending, or parsing protocol
/// traffic.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Underlying socket failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A connect or read deadline expired.
    #[error("timed out while {action}")]
    Timeout { action: &'static str },

    /// The request buffer could not be parsed.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The response buffer could not be parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
