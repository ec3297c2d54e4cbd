//! Store error types.

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while loading or saving a store document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to read a store document.
    #[error("failed to read store '{name}': {source}")]
    Read {
        name: String,
        source: std::io::Error,
    },

    /// Failed to write a store document.
    #[error("failed to write store '{name}': {source}")]
    Write {
        name: String,
        source: std::io::Error,
    },

    /// Failed to decode a store document.
    #[error("failed to decode store '{name}': {source}")]
    Decode {
        name: String,
        source: serde_json::Error,
    },

    /// Failed to encode a value for storage.
    #[error("failed to encode store '{name}': {source}")]
    Encode {
        name: String,
        source: serde_json::Error,
    },
}
