//! Errors raised while ingesting a captured trace.

use thiserror::Error;

/// Errors that can interrupt trace ingest.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Failed to read the capture itself.
    #[error("I/O error reading trace: {0}")]
    Io(#[from] std::io::Error),

    /// The pcapng container was malformed.
    #[error("pcapng parse error: {0}")]
    Pcap(#[from] pcarp::Error),

    /// A framed message was malformed or couldn't be applied to memory.
    #[error("protocol error: {0}")]
    Core(#[from] wintex_core::CoreError),
}
