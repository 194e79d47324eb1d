//! Stream demultiplexer: turns an incoming byte stream into [`Message`]s.
//!
//! UDL has no fixed frame rate and no out-of-band delimiter besides the
//! length byte itself, so a reader has to accumulate bytes until it has a
//! complete, checksum-valid frame. [`Framer`] does that incrementally so it
//! can sit behind a socket read loop: feed it whatever bytes just arrived,
//! get back zero or more completed messages.

use tracing::{debug, warn};

use crate::{RESYNC_MARKER, errors::Result, message::Message, verify};

/// Incremental frame reader over a byte stream.
///
/// Bytes are appended with [`Framer::feed`], which returns every frame that
/// became complete and checksum-valid as a result. A frame whose checksum
/// doesn't verify (or whose declared length is too short to hold a command
/// byte) is dropped and the reader resynchronises by searching for the
/// `ATZ\r` reset string, discarding everything up to and including it - or
/// the whole buffer, if the marker never appears.
#[derive(Debug, Default)]
pub struct Framer {
    buf: Vec<u8>,
}

impl Framer {
    /// Creates an empty framer.
    #[must_use]
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Number of bytes currently buffered, waiting on a complete frame.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Appends `bytes` to the internal buffer and extracts every frame that
    /// is now complete.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ProtoError::LengthMismatch`] from [`verify`] only
    /// in the case of an internal bug (`verify` is always called here with a
    /// slice whose length matches its own declared length); this should never
    /// actually happen; callers can safely treat it as fatal if it does.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<Message>> {
        self.buf.extend_from_slice(bytes);

        let mut out = Vec::new();
        loop {
            let Some(&declared) = self.buf.first() else { break };
            let declared_len = declared as usize;

            if declared_len < crate::MIN_FRAME_LEN {
                warn!(declared_len, "frame length below minimum, resynchronising");
                self.resync();
                continue;
            }

            if self.buf.len() < declared_len {
                // Not enough bytes yet; wait for more.
                break;
            }

            let candidate = &self.buf[..declared_len];
            if verify(candidate)? {
                let msg = Message::parse(&candidate[1..declared_len - 1])?;
                debug!(cmd = msg.cmd, len = declared_len, "frame verified");
                out.push(msg);
                self.buf.drain(..declared_len);
            } else {
                warn!(declared_len, "checksum mismatch, resynchronising");
                self.resync();
            }
        }
        Ok(out)
    }

    /// Discards buffered bytes up to and including the next `ATZ\r` marker,
    /// or the entire buffer if the marker is not present.
    fn resync(&mut self) {
        if let Some(pos) = find_subslice(&self.buf, RESYNC_MARKER) {
            self.buf.drain(..pos + RESYNC_MARKER.len());
        } else {
            self.buf.clear();
        }
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
