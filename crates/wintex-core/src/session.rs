//! Session state machine (C2): frames a raw byte feed, hands each message to
//! a handler, and re-frames whatever reply the handler returns.

use tracing::warn;
use wintex_proto::{Framer, Message};

use crate::{
    addr::split_address_triple,
    decode::get_bcd,
    error::Result,
    memory::{Memory, Region},
};

/// Consumes a direction-labelled byte feed and dispatches each extracted
/// message to a handler.
///
/// The handler decides whether a reply is warranted: returning `Some(body)`
/// causes the session to re-frame `body` via [`wintex_proto::frame`] and
/// hand the framed bytes back to the caller; returning `None` means no wire
/// reply (heartbeat pass-through, passive observation, and so on).
pub struct Session<H> {
    framer: Framer,
    handler: H,
}

impl<H> Session<H>
where
    H: FnMut(&Message) -> Option<Vec<u8>>,
{
    /// Builds a session around `handler`.
    pub fn new(handler: H) -> Self {
        Self { framer: Framer::new(), handler }
    }

    /// Feeds raw bytes in, returning every framed reply the handler produced
    /// for the messages that became complete as a result.
    ///
    /// # Errors
    ///
    /// Propagates framing errors from the underlying [`Framer`] and from
    /// re-framing an oversized reply.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
        let messages = self.framer.feed(bytes)?;
        let mut replies = Vec::new();
        for message in messages {
            if let Some(body) = (self.handler)(&message) {
                replies.push(wintex_proto::frame(&body)?);
            }
        }
        Ok(replies)
    }
}

/// Observer-role state for the panel-facing direction of a captured or
/// relayed session: extracts the serial and banner from `Z` messages and
/// stores `I`/`W` response bodies into a shared [`Memory`]. Never replies.
///
/// The first non-empty `Z` body seen is the panel's serial challenge; the
/// second is its banner response. This mirrors the handshake in
/// [`crate::model`]: `Z 0x05 <7 BCD bytes>` then `Z <20-byte banner>`.
#[derive(Debug, Default)]
pub struct PanelObserver {
    non_empty_logins_seen: u32,
}

impl PanelObserver {
    /// Builds a fresh observer with no `Z` messages seen yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one message against `memory`, mutating it as appropriate.
    /// Always returns `None`: an observer never replies.
    pub fn observe(&mut self, memory: &mut Memory, message: &Message) -> Option<Vec<u8>> {
        use wintex_proto::Command;
        match message.command() {
            Command::Login if !message.body.is_empty() => {
                self.non_empty_logins_seen += 1;
                match self.non_empty_logins_seen {
                    1 if message.body.len() >= 8 => {
                        let serial = get_bcd(&message.body, 1, 7);
                        let _ = memory.set_serial(serial);
                    },
                    2 => {
                        let banner =
                            String::from_utf8_lossy(&message.body).trim_end_matches('\0').to_string();
                        let _ = memory.set_banner(banner);
                    },
                    _ => {},
                }
            },
            Command::MemResponse => store_response(memory, Region::Mem, &message.body),
            Command::IoResponse => store_response(memory, Region::Io, &message.body),
            _ => {},
        }
        None
    }
}

/// Observer-role state for the client-facing direction: extracts the UDL
/// password from the single non-empty `Z` message sent in that direction.
/// Never replies.
#[derive(Debug, Default)]
pub struct PasswordObserver {
    seen: bool,
}

impl PasswordObserver {
    /// Builds a fresh observer that hasn't seen a password yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one message against `memory`. Always returns `None`.
    pub fn observe(&mut self, memory: &mut Memory, message: &Message) -> Option<Vec<u8>> {
        use wintex_proto::Command;
        if !self.seen && message.command() == Command::Login && !message.body.is_empty() {
            self.seen = true;
            let password =
                String::from_utf8_lossy(&message.body).trim_end_matches('\0').to_string();
            let _ = memory.set_udlpasswd(password);
        }
        None
    }
}

fn store_response(memory: &mut Memory, region: Region, body: &[u8]) {
    let Some((base, size, data)) = split_address_triple(body) else {
        warn!(len = body.len(), "response body too short for an address triple");
        return;
    };
    if data.len() == size as usize {
        if let Err(err) = memory.apply_read_response(region, base, u32::from(size), data) {
            warn!(%err, base, size, "dropping response that failed to apply");
        }
    } else {
        warn!(base, declared = size, actual = data.len(), "response size does not match payload");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use wintex_proto::Message;

    use super::*;

    #[test]
    fn panel_observer_learns_serial_then_banner() {
        let mut memory = Memory::new();
        let mut observer = PanelObserver::new();

        let mut serial_body = vec![0x05u8];
        serial_body.extend_from_slice(&[0x12, 0x34, 0x56, 0x70, 0x00, 0x00, 0x00]);
        observer.observe(&mut memory, &Message::new(b'Z', serial_body));
        assert_eq!(memory.serial(), "12345670000000");

        observer.observe(&mut memory, &Message::new(b'Z', &b"Elite 24    V6.05.03"[..]));
        assert_eq!(memory.banner(), "Elite 24    V6.05.03");
    }

    #[test]
    fn panel_observer_stores_mem_responses() {
        let mut memory = Memory::new();
        memory.set_banner("Elite 24    V6.05.03").unwrap();
        let mut observer = PanelObserver::new();

        let mut body = vec![0x00, 0x00, 0x10, 4];
        body.extend_from_slice(&[1, 2, 3, 4]);
        observer.observe(&mut memory, &Message::new(b'I', body));

        assert_eq!(&memory.mem()[0x10..0x14], &[1, 2, 3, 4]);
        assert_eq!(memory.mem_ranges(), &[(0x10, 4)]);
    }

    #[test]
    fn password_observer_learns_only_the_first_non_empty_login() {
        let mut memory = Memory::new();
        let mut observer = PasswordObserver::new();
        observer.observe(&mut memory, &Message::new(b'Z', &b"hunter2"[..]));
        assert_eq!(memory.udlpasswd(), "hunter2");
    }

    #[test]
    fn session_reframes_handler_replies() {
        let mut session = Session::new(|msg: &Message| {
            (msg.cmd == b'P').then(|| b"P\xFF\xFF".to_vec())
        });
        let wire = wintex_proto::frame(b"P").unwrap();
        let replies = session.feed(&wire).unwrap();
        assert_eq!(replies, vec![wintex_proto::frame(b"P\xFF\xFF").unwrap()]);
    }

    #[test]
    fn session_handler_returning_none_produces_no_reply() {
        let mut session = Session::new(|_: &Message| None);
        let wire = wintex_proto::frame(b"P").unwrap();
        assert!(session.feed(&wire).unwrap().is_empty());
    }
}
