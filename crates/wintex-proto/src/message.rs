//! Command bytes and the decoded payload of a single frame.

use bytes::Bytes;

use crate::errors::{ProtoError, Result};

/// The one-byte command codes used by the UDL protocol.
///
/// Each variant corresponds to a single ASCII command byte that opens a
/// frame's payload. `Hangup` is special: the panel may signal it either with
/// the ASCII byte `H` or with the raw control byte `0x06`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `Z` - login / identification challenge and response.
    Login,
    /// `O` - read a page of panel memory.
    ReadMem,
    /// `I` - response to a memory read, carrying a page of data.
    MemResponse,
    /// `R` - read live I/O state.
    ReadIo,
    /// `W` - write/push of live I/O state.
    IoResponse,
    /// `P` - heartbeat / keepalive.
    Heartbeat,
    /// `K` - keypad key press.
    Keypad,
    /// `A` - arm request.
    Arm,
    /// `C` - reset/cancel.
    Reset,
    /// `S` - part-arm request.
    PartArm,
    /// `U` - commit/unlock.
    Commit,
    /// `B` - real-time clock read/set.
    Rtc,
    /// `H` or raw `0x06` - hangup.
    Hangup,
    /// Any other command byte, carried verbatim.
    Other(u8),
}

impl Command {
    /// Maps a raw command byte to its [`Command`] variant.
    #[must_use]
    pub fn from_byte(b: u8) -> Self {
        match b {
            b'Z' => Command::Login,
            b'O' => Command::ReadMem,
            b'I' => Command::MemResponse,
            b'R' => Command::ReadIo,
            b'W' => Command::IoResponse,
            b'P' => Command::Heartbeat,
            b'K' => Command::Keypad,
            b'A' => Command::Arm,
            b'C' => Command::Reset,
            b'S' => Command::PartArm,
            b'U' => Command::Commit,
            b'B' => Command::Rtc,
            b'H' | 0x06 => Command::Hangup,
            other => Command::Other(other),
        }
    }

    /// The canonical wire byte for this command.
    ///
    /// `Hangup` always encodes as the ASCII `H`; panels that instead send the
    /// raw `0x06` byte are handled on decode, not re-encoded as `0x06` here.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            Command::Login => b'Z',
            Command::ReadMem => b'O',
            Command::MemResponse => b'I',
            Command::ReadIo => b'R',
            Command::IoResponse => b'W',
            Command::Heartbeat => b'P',
            Command::Keypad => b'K',
            Command::Arm => b'A',
            Command::Reset => b'C',
            Command::PartArm => b'S',
            Command::Commit => b'U',
            Command::Rtc => b'B',
            Command::Hangup => b'H',
            Command::Other(b) => b,
        }
    }
}

/// A decoded frame: a command and the body bytes that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The raw command byte, preserved verbatim (so a `0x06` hangup byte
    /// round-trips exactly instead of being normalised to `H`).
    pub cmd: u8,
    /// Bytes following the command byte, excluding the checksum.
    pub body: Bytes,
}

impl Message {
    /// Builds a message from a command and body.
    #[must_use]
    pub fn new(cmd: u8, body: impl Into<Bytes>) -> Self {
        Self { cmd, body: body.into() }
    }

    /// This message's [`Command`] variant.
    #[must_use]
    pub fn command(&self) -> Command {
        Command::from_byte(self.cmd)
    }

    /// Parses a verified frame's payload (length and checksum bytes already
    /// stripped) into a command byte and body.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::EmptyMessage`] if `payload` is empty.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let (&cmd, body) = payload.split_first().ok_or(ProtoError::EmptyMessage)?;
        Ok(Self { cmd, body: Bytes::copy_from_slice(body) })
    }

    /// Encodes this message's command byte and body into a frame payload,
    /// ready to pass to [`crate::frame`].
    #[must_use]
    pub fn to_payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.body.len());
        out.push(self.cmd);
        out.extend_from_slice(&self.body);
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn hangup_recognised_from_both_encodings() {
        assert_eq!(Command::from_byte(b'H'), Command::Hangup);
        assert_eq!(Command::from_byte(0x06), Command::Hangup);
    }

    #[test]
    fn parse_rejects_empty_payload() {
        assert!(matches!(Message::parse(&[]), Err(ProtoError::EmptyMessage)));
    }

    #[test]
    fn parse_splits_command_and_body() {
        let msg = Message::parse(b"Zhello").unwrap();
        assert_eq!(msg.cmd, b'Z');
        assert_eq!(&msg.body[..], b"hello");
        assert_eq!(msg.command(), Command::Login);
    }

    #[test]
    fn to_payload_round_trips() {
        let msg = Message::new(b'O', Bytes::from_static(b"\x01\x02\x03"));
        assert_eq!(msg.to_payload(), vec![b'O', 0x01, 0x02, 0x03]);
    }
}
