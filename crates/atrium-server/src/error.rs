//! Server error types.

use atrium_store::StoreError;

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors surfaced while starting or running a service.
///
/// Request-level failures never appear here: operations answer those
/// with an [`atrium_types::Outcome`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Listener or connection failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The service's store could not be loaded or saved.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The cluster configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize config.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
