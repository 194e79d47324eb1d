//! Panel-role message dispatch (C9): answers the command set a real panel
//! would answer, driven by an owned [`Memory`] rather than live hardware.

use tracing::{debug, info, warn};
use wintex_core::{
    Memory, Region,
    addr::{encode_address_triple, split_address_triple},
    decode::put_bcd,
};
use wintex_proto::{Command, Message};

/// The single-byte acknowledgement the panel sends back for writes and
/// actions that don't carry any other reply payload.
const ACK: u8 = 0x06;

/// Services one connection's worth of messages against its own memory
/// image. Each connection gets its own [`PanelHandler`] (and its own cloned
/// [`Memory`]) - nothing here is shared across connections.
pub struct PanelHandler {
    memory: Memory,
    conn_id: u64,
}

impl PanelHandler {
    /// Builds a handler for connection `conn_id`, starting from `memory`.
    #[must_use]
    pub fn new(memory: Memory, conn_id: u64) -> Self {
        Self { memory, conn_id }
    }

    /// The memory image this handler has been mutating, for inspection after
    /// the connection closes (e.g. to persist changes).
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Dispatches one decoded message, returning the reply payload (if any)
    /// for the caller to frame and write back.
    pub fn handle(&mut self, message: &Message) -> Option<Vec<u8>> {
        match message.command() {
            Command::Login => self.handle_login(&message.body),
            Command::ReadMem => self.handle_read(Region::Mem, b'I', &message.body),
            Command::MemResponse => self.handle_write(Region::Mem, &message.body),
            Command::ReadIo => self.handle_read(Region::Io, b'W', &message.body),
            Command::IoResponse => self.handle_write(Region::Io, &message.body),
            Command::Heartbeat => Some(vec![b'P', 0xFF, 0xFF]),
            Command::Keypad => self.handle_keypad(&message.body),
            Command::Arm | Command::Reset | Command::PartArm => {
                self.handle_action(message.cmd, &message.body)
            },
            Command::Commit => self.handle_commit(&message.body),
            Command::Rtc => {
                info!(conn = self.conn_id, "clock request");
                Some(vec![ACK])
            },
            // Framed as `frame(&[0x06])`, which is exactly the 3-byte wire
            // sequence `03 06 F6` - same payload as an ACK, different name.
            Command::Hangup => Some(vec![ACK]),
            Command::Other(cmd) => {
                warn!(conn = self.conn_id, cmd, "unhandled command");
                None
            },
        }
    }

    fn handle_login(&mut self, body: &[u8]) -> Option<Vec<u8>> {
        if body.is_empty() {
            let mut payload = vec![b'Z', 0x05];
            payload.extend(put_bcd(self.memory.serial(), 7));
            debug!(conn = self.conn_id, "sent serial challenge");
            return Some(payload);
        }
        // A real panel would reject a wrong password here; this replay role
        // always answers with its banner, matching the permissive handshake
        // the capture traces show.
        info!(conn = self.conn_id, "login accepted");
        let mut banner = self.memory.banner().as_bytes().to_vec();
        banner.resize(20, 0);
        let mut payload = vec![b'Z'];
        payload.extend(banner);
        Some(payload)
    }

    fn handle_read(&mut self, region: Region, response_cmd: u8, body: &[u8]) -> Option<Vec<u8>> {
        let (base, size, _) = split_address_triple(body)?;
        let buf = match region {
            Region::Mem => self.memory.mem(),
            Region::Io => self.memory.io(),
        };
        let start = base as usize;
        let end = start.checked_add(size as usize)?;
        let Some(data) = buf.get(start..end) else {
            warn!(conn = self.conn_id, base, size, "read request out of bounds");
            return None;
        };
        let mut payload = vec![response_cmd];
        payload.extend_from_slice(&encode_address_triple(base, size));
        payload.extend_from_slice(data);
        Some(payload)
    }

    fn handle_write(&mut self, region: Region, body: &[u8]) -> Option<Vec<u8>> {
        let (base, size, data) = split_address_triple(body)?;
        if data.len() != size as usize {
            warn!(conn = self.conn_id, base, size, actual = data.len(), "write size mismatch");
            return None;
        }
        let buf = match region {
            Region::Mem => self.memory.mem(),
            Region::Io => self.memory.io(),
        };
        if let Some(old) = buf.get(base as usize..base as usize + data.len()) {
            for (i, (&prev, &next)) in old.iter().zip(data.iter()).enumerate() {
                if prev != next {
                    debug!(
                        conn = self.conn_id,
                        offset = base as usize + i,
                        old = prev,
                        new = next,
                        "byte changed"
                    );
                }
            }
        }
        if let Err(err) = self.memory.apply_write(region, base, u32::from(size), data) {
            warn!(conn = self.conn_id, %err, "rejected write");
            return None;
        }
        Some(vec![ACK])
    }

    fn handle_keypad(&mut self, body: &[u8]) -> Option<Vec<u8>> {
        let &keypad = body.first()?;
        let code = &body[1..];
        info!(conn = self.conn_id, keypad, code = ?code, "keypad input");
        Some(vec![ACK])
    }

    fn handle_action(&mut self, cmd: u8, body: &[u8]) -> Option<Vec<u8>> {
        let area = body.first().copied();
        let kind = body.get(1).copied();
        info!(conn = self.conn_id, cmd = cmd as char, area, kind, "action request");
        Some(vec![ACK])
    }

    fn handle_commit(&mut self, body: &[u8]) -> Option<Vec<u8>> {
        match body.first() {
            Some(1) => {
                info!(conn = self.conn_id, "commit zone changes");
                Some(vec![ACK])
            },
            Some(64) => {
                info!(conn = self.conn_id, "broadcast message");
                Some(vec![ACK])
            },
            Some(&op) => {
                debug!(conn = self.conn_id, op, "unhandled commit sub-opcode");
                None
            },
            None => {
                warn!(conn = self.conn_id, "commit with no sub-opcode");
                None
            },
        }
    }
}
