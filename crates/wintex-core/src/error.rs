//! Error types for memory reconstruction, planning and decoding.
//!
//! Framing errors (bad checksum, truncated frame) are handled inside
//! [`wintex_proto`] by resynchronising and are not surfaced here. What lands
//! in [`CoreError`] are the "contract" violations described in the
//! specification's error-handling design: conditions that are fatal to the
//! current operation even though the underlying stream may still be usable.

use thiserror::Error;

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while reconstructing or decoding panel memory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A read/write response's data length did not match its declared size.
    #[error("response declared {declared} bytes but carried {actual}")]
    SizeMismatch {
        /// Size byte from the wire.
        declared: usize,
        /// Actual payload length observed.
        actual: usize,
    },

    /// A write would run past the end of its target buffer.
    #[error("write of {size} bytes at offset {base:#x} overruns a {region_len}-byte buffer")]
    OutOfBounds {
        /// Offset the write begins at.
        base: usize,
        /// Number of bytes the write would touch.
        size: usize,
        /// Length of the buffer being written into.
        region_len: usize,
    },

    /// An identity field (`banner`, `serial`, `udlpasswd`) was set twice.
    #[error("{field} is already set and cannot be reassigned")]
    IdentityAlreadySet {
        /// Name of the field that was already populated.
        field: &'static str,
    },

    /// A read was planned against a model whose topic tables are not known
    /// to be offset-compatible with its memory layout.
    #[error("cannot plan reads against an unidentified panel model")]
    UnplannableModel,

    /// A page request exceeded the 64-byte transfer cap.
    #[error("page size {size} exceeds the 64-byte transfer limit")]
    PageTooLarge {
        /// The offending requested size.
        size: usize,
    },

    /// A reply's command byte, or its echoed address/size, did not match
    /// what the request expected.
    #[error("expected reply {expected:?} for request at {base:#x}/{size}, got {actual:?}")]
    UnexpectedReply {
        /// Command byte the caller expected.
        expected: u8,
        /// Command byte actually received.
        actual: u8,
        /// Base address of the originating request.
        base: u32,
        /// Size of the originating request.
        size: usize,
    },

    /// A persisted panel file had the wrong magic bytes or version.
    #[error("bad panel file: {0}")]
    Persistence(String),

    /// A lower-level framing error.
    #[error(transparent)]
    Proto(#[from] wintex_proto::ProtoError),

    /// A transport (I/O) failure; the session ends with partial results
    /// retained in the memory model.
    #[error("transport error: {0}")]
    Transport(String),
}

impl CoreError {
    /// Transport failures are the only errors here that a caller may want to
    /// treat as "the session simply ended", rather than as a logic bug.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
