//! Wire framing for the Wintex Upload/Download (UDL) protocol.
//!
//! UDL frames are short, length-prefixed byte strings carried over a TCP or
//! serial bridge to a Texecom Premier/Premier-Elite intruder alarm panel.
//! This crate handles only the framing layer: computing and verifying the
//! subtractive checksum, splitting an incoming byte stream into frames, and
//! resynchronising after a corrupted frame. It knows nothing about what a
//! command byte means - that's [`wintex_core`](https://docs.rs/wintex-core).
//!
//! # Wire format
//!
//! ```text
//! byte 0        : frame length L (3 <= L <= 255)
//! bytes 1..L-2  : payload (command byte + command-specific body)
//! byte L-1      : checksum
//! ```
//!
//! The checksum is defined so that `0xFF` minus the sum of every byte in the
//! frame, taken modulo 256, is zero for a valid frame.

pub mod errors;
pub mod frame;
pub mod message;

pub use errors::{ProtoError, Result};
pub use frame::Framer;
pub use message::{Command, Message};

/// Minimum valid frame length: one command byte plus the checksum byte.
pub const MIN_FRAME_LEN: usize = 3;

/// Maximum valid frame length (the length byte is a single `u8`).
pub const MAX_FRAME_LEN: usize = 255;

/// Maximum payload a single frame can carry (`MAX_FRAME_LEN` minus the length
/// and checksum bytes).
pub const MAX_PAYLOAD_LEN: usize = MAX_FRAME_LEN - 2;

/// The Hayes reset string used to resynchronise after a bad checksum.
pub const RESYNC_MARKER: &[u8] = b"ATZ\r";

/// Computes the UDL subtractive checksum over `bytes`.
///
/// This is the running value `0xFF - sum(bytes) mod 256`. Called over a
/// complete frame (length byte, payload, and checksum byte) it returns zero
/// for a well-formed frame. Called over everything but the checksum byte it
/// returns the checksum byte that should be appended.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u8 {
    let mut v: u8 = 0xFF;
    for &b in bytes {
        v = v.wrapping_sub(b);
    }
    v
}

/// Encodes a payload (command byte + body) into a framed, checksummed byte
/// string ready to put on the wire.
///
/// # Errors
///
/// Returns [`ProtoError::PayloadTooLong`] if `payload.len() > MAX_PAYLOAD_LEN`
/// (253 bytes).
pub fn frame(payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(ProtoError::PayloadTooLong { len: payload.len() });
    }

    // length byte counts itself and the checksum byte too.
    let len = payload.len() + 2;
    let mut out = Vec::with_capacity(len);
    out.push(len as u8);
    out.extend_from_slice(payload);
    // Checksum is computed over the frame with a zero placeholder for itself;
    // since a zero byte contributes nothing to the running subtraction, this
    // is equivalent to checksumming the length byte and payload alone.
    let c = checksum(&out);
    out.push(c);
    Ok(out)
}

/// Verifies that `candidate` is a well-formed, checksum-valid frame.
///
/// # Errors
///
/// Returns [`ProtoError::LengthMismatch`] if `candidate[0]` (the declared
/// frame length) does not equal `candidate.len()`. Calling `verify` with a
/// buffer that does not exactly match its own declared length is a
/// programmer error, not a recoverable protocol condition - callers (notably
/// [`Framer::feed`]) are responsible for slicing out exactly `declared_len`
/// bytes before calling this.
pub fn verify(candidate: &[u8]) -> Result<bool> {
    let Some(&declared) = candidate.first() else {
        return Err(ProtoError::LengthMismatch { declared: 0, actual: 0 });
    };
    if declared as usize != candidate.len() {
        return Err(ProtoError::LengthMismatch {
            declared: declared as usize,
            actual: candidate.len(),
        });
    }
    Ok(checksum(candidate) == 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn checksum_vectors() {
        assert!(verify(&[0x03, 0x5A, 0xA2]).unwrap());
        assert!(!verify(&[0x03, 0x5A, 0xA3]).unwrap());
        assert!(
            verify(&[
                0x17, 0x5A, 0x45, 0x6C, 0x69, 0x74, 0x65, 0x20, 0x32, 0x34, 0x20, 0x20, 0x20,
                0x20, 0x56, 0x36, 0x2E, 0x30, 0x35, 0x2E, 0x30, 0x33, 0xE5
            ])
            .unwrap()
        );
        assert!(
            verify(&[0x08, 0x49, 0x00, 0x16, 0x78, 0x01, 0x06, 0x19]).unwrap()
        );
    }

    #[test]
    fn frame_construction_vectors() {
        assert_eq!(frame(b"Z").unwrap(), vec![0x03, 0x5A, 0xA2]);
        assert_eq!(frame(b"P").unwrap(), vec![0x03, 0x50, 0xAC]);
        assert_eq!(
            frame(b"ZElite 24    V6.05.03").unwrap(),
            vec![
                0x17, 0x5A, 0x45, 0x6C, 0x69, 0x74, 0x65, 0x20, 0x32, 0x34, 0x20, 0x20, 0x20,
                0x20, 0x56, 0x36, 0x2E, 0x30, 0x35, 0x2E, 0x30, 0x33, 0xE5
            ]
        );
    }

    #[test]
    fn reject_oversize_payload() {
        let payload = vec![0u8; MAX_PAYLOAD_LEN + 1];
        assert!(matches!(frame(&payload), Err(ProtoError::PayloadTooLong { .. })));
    }

    #[test]
    fn length_mismatch_is_reported() {
        let result = verify(&[0x05, 0x5A, 0xA2]);
        assert!(matches!(result, Err(ProtoError::LengthMismatch { declared: 5, actual: 3 })));
    }

    proptest! {
        #[test]
        fn checksum_round_trip(payload in prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_LEN)) {
            let framed = frame(&payload).expect("payload within bounds");
            prop_assert!(verify(&framed).expect("exact-length buffer"));
        }
    }
}
