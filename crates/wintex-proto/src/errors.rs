//! Error types for frame encoding, verification and demultiplexing.

use thiserror::Error;

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, ProtoError>;

/// Errors raised while building or parsing UDL frames.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtoError {
    /// The payload handed to [`crate::frame`] would not fit in a single
    /// frame (the length byte is a `u8`, capping frames at 255 bytes).
    #[error("payload too long: {len} bytes exceeds the 253-byte limit")]
    PayloadTooLong {
        /// Length of the offending payload.
        len: usize,
    },

    /// The buffer handed to [`crate::verify`] does not match its own
    /// declared length prefix.
    #[error("frame declares length {declared} but buffer holds {actual} bytes")]
    LengthMismatch {
        /// The length byte read from the buffer.
        declared: usize,
        /// The buffer's actual length.
        actual: usize,
    },

    /// A frame declared a length below the three-byte minimum (command byte
    /// plus checksum byte).
    #[error("frame length {declared} is below the 3-byte minimum")]
    FrameTooShort {
        /// The offending declared length.
        declared: usize,
    },

    /// A frame's payload was empty, so there was no command byte to read.
    #[error("frame has no command byte")]
    EmptyMessage,
}
