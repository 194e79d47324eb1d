//! Top-level error type for the replay server binary.

use thiserror::Error;

/// Errors that can abort the server before it starts serving connections.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind the listening socket.
    #[error("failed to bind listener: {source}")]
    Bind {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to load the persisted panel snapshot.
    #[error("panel file error: {0}")]
    Panel(#[from] wintex_core::persist::PersistError),

    /// Failed to read or write the panel snapshot file on disk.
    #[error("panel file I/O error: {0}")]
    Io(#[from] std::io::Error),
}
