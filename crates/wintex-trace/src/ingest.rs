//! Drives two independent framer/observer pairs from direction-labelled byte
//! feeds into a single shared memory image.

use wintex_core::{CoreError, Memory, PanelObserver, PasswordObserver};
use wintex_proto::Framer;

use crate::error::TraceError;

/// Accumulates a reconstructed [`Memory`] from a captured duplex byte
/// stream, split into its two directions.
///
/// The panel-facing direction (`term` in a ser2net capture, server→client in
/// a pcap capture) feeds a [`PanelObserver`], which learns the serial,
/// banner, and every `I`/`W` response body. The client-facing direction
/// (`tcp`/client→server) feeds a [`PasswordObserver`], which learns the UDL
/// password. Each direction owns its own [`Framer`], since they're
/// independent byte streams that happen to share one logical session.
pub struct TraceIngest {
    memory: Memory,
    panel_framer: Framer,
    panel_observer: PanelObserver,
    client_framer: Framer,
    password_observer: PasswordObserver,
}

impl TraceIngest {
    /// Builds a fresh ingest accumulator around an empty [`Memory`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            memory: Memory::new(),
            panel_framer: Framer::new(),
            panel_observer: PanelObserver::new(),
            client_framer: Framer::new(),
            password_observer: PasswordObserver::new(),
        }
    }

    /// Feeds bytes observed in the panel-facing direction.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Core`] if framing fails.
    pub fn feed_panel(&mut self, bytes: &[u8]) -> Result<(), TraceError> {
        let messages = self.panel_framer.feed(bytes).map_err(CoreError::from)?;
        for message in &messages {
            self.panel_observer.observe(&mut self.memory, message);
        }
        Ok(())
    }

    /// Feeds bytes observed in the client-facing direction.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Core`] if framing fails.
    pub fn feed_client(&mut self, bytes: &[u8]) -> Result<(), TraceError> {
        let messages = self.client_framer.feed(bytes).map_err(CoreError::from)?;
        for message in &messages {
            self.password_observer.observe(&mut self.memory, message);
        }
        Ok(())
    }

    /// The memory image accumulated so far.
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Consumes this ingest, returning its accumulated memory image.
    #[must_use]
    pub fn into_memory(self) -> Memory {
        self.memory
    }
}

impl Default for TraceIngest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn panel_direction_learns_serial_and_mem_responses() {
        let mut ingest = TraceIngest::new();

        let mut serial_body = vec![b'Z', 0x05];
        serial_body.extend_from_slice(&[0x12, 0x34, 0x56, 0x70, 0x00, 0x00, 0x00]);
        ingest.feed_panel(&wintex_proto::frame(&serial_body).unwrap()).unwrap();
        assert_eq!(ingest.memory().serial(), "12345670000000");

        ingest.feed_panel(&wintex_proto::frame(b"ZElite 24    V6.05.03").unwrap()).unwrap();
        assert_eq!(ingest.memory().banner(), "Elite 24    V6.05.03");

        let mut mem_body = vec![b'I', 0x00, 0x00, 0x10, 4];
        mem_body.extend_from_slice(&[1, 2, 3, 4]);
        ingest.feed_panel(&wintex_proto::frame(&mem_body).unwrap()).unwrap();
        assert_eq!(&ingest.memory().mem()[0x10..0x14], &[1, 2, 3, 4]);
    }

    #[test]
    fn client_direction_learns_password() {
        let mut ingest = TraceIngest::new();
        ingest.feed_client(&wintex_proto::frame(b"Zhunter2").unwrap()).unwrap();
        assert_eq!(ingest.memory().udlpasswd(), "hunter2");
    }
}
