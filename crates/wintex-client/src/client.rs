//! UDL client (C8): connects to a panel over TCP, performs the login
//! handshake, and issues paged reads driven by the read planner.

use std::time::Duration;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpStream, ToSocketAddrs},
    time::sleep,
};
use tracing::{debug, info, instrument};
use wintex_core::{
    CoreError, Memory, Region, Result, Topics,
    addr::{encode_address_triple, split_address_triple},
    plan,
    ranges::PAGE_SIZE,
};
use wintex_proto::{Message, verify};

/// How long to wait after opening the TCP stream before sending anything.
/// The upstream serial bridge silently drops the first frames otherwise -
/// a carrier quirk, not a protocol requirement.
const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// A connected UDL session, driving reads into its own [`Memory`].
pub struct UdlClient {
    stream: TcpStream,
    memory: Memory,
}

impl UdlClient {
    /// Connects to `addr`, waits out the settle delay, and performs the
    /// login handshake with `password`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Transport`] on connection or I/O failure, or
    /// [`CoreError::UnexpectedReply`] if the panel's handshake responses
    /// don't match what's expected.
    #[instrument(skip(password))]
    pub async fn connect(addr: impl ToSocketAddrs + std::fmt::Debug, password: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let mut client = Self { stream, memory: Memory::new() };
        sleep(SETTLE_DELAY).await;
        client.login(password).await?;
        Ok(client)
    }

    async fn login(&mut self, password: &str) -> Result<()> {
        self.send(b"Z").await?;
        let serial_challenge = self.recv_frame().await?;
        if serial_challenge.cmd != b'Z' || serial_challenge.body.len() < 8 {
            return Err(CoreError::UnexpectedReply {
                expected: b'Z',
                actual: serial_challenge.cmd,
                base: 0,
                size: 0,
            });
        }
        let serial = wintex_core::decode::get_bcd(&serial_challenge.body, 1, 7);
        self.memory.set_serial(serial)?;
        info!(serial = self.memory.serial(), "received serial challenge");

        let mut login_payload = vec![b'Z'];
        login_payload.extend_from_slice(password.as_bytes());
        self.send(&login_payload).await?;
        let banner_reply = self.recv_frame().await?;
        if banner_reply.cmd != b'Z' {
            return Err(CoreError::UnexpectedReply {
                expected: b'Z',
                actual: banner_reply.cmd,
                base: 0,
                size: 0,
            });
        }
        let banner = String::from_utf8_lossy(&banner_reply.body).trim_end_matches('\0').to_string();
        info!(banner = banner.as_str(), "identified panel");
        self.memory.set_banner(banner)?;
        Ok(())
    }

    /// Sends a heartbeat and expects `P 0xFF 0xFF` back.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnexpectedReply`] if the panel doesn't answer
    /// with the expected heartbeat acknowledgement.
    pub async fn heartbeat(&mut self) -> Result<()> {
        self.send(b"P").await?;
        let reply = self.recv_frame().await?;
        if reply.cmd != b'P' || &reply.body[..] != [0xFF, 0xFF] {
            return Err(CoreError::UnexpectedReply {
                expected: b'P',
                actual: reply.cmd,
                base: 0,
                size: 0,
            });
        }
        Ok(())
    }

    /// Reads `size` bytes of configuration memory at `base` and applies the
    /// response to this client's [`Memory`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PageTooLarge`] if `size` exceeds the 64-byte
    /// transfer cap, or [`CoreError::UnexpectedReply`] if the reply doesn't
    /// echo back the requested command, address and size.
    pub async fn read_mem(&mut self, base: u32, size: u8) -> Result<Vec<u8>> {
        self.read_region(Region::Mem, b'O', b'I', base, size).await
    }

    /// Reads `size` bytes of live I/O state at `base` and applies the
    /// response. See [`UdlClient::read_mem`] for error conditions.
    pub async fn read_io(&mut self, base: u32, size: u8) -> Result<Vec<u8>> {
        self.read_region(Region::Io, b'R', b'W', base, size).await
    }

    async fn read_region(
        &mut self,
        region: Region,
        request_cmd: u8,
        response_cmd: u8,
        base: u32,
        size: u8,
    ) -> Result<Vec<u8>> {
        if size as usize > PAGE_SIZE {
            return Err(CoreError::PageTooLarge { size: size as usize });
        }

        let mut payload = vec![request_cmd];
        payload.extend_from_slice(&encode_address_triple(base, size));
        self.send(&payload).await?;

        let reply = self.recv_frame().await?;
        if reply.cmd != response_cmd {
            return Err(CoreError::UnexpectedReply {
                expected: response_cmd,
                actual: reply.cmd,
                base,
                size: size as usize,
            });
        }
        let Some((rbase, rsize, data)) = split_address_triple(&reply.body) else {
            return Err(CoreError::UnexpectedReply { expected: response_cmd, actual: reply.cmd, base, size: size as usize });
        };
        if rbase != base || rsize != size || data.len() != size as usize {
            return Err(CoreError::UnexpectedReply {
                expected: response_cmd,
                actual: reply.cmd,
                base,
                size: size as usize,
            });
        }

        self.memory.apply_read_response(region, base, u32::from(size), data)?;
        Ok(data.to_vec())
    }

    /// Plans reads for `topics` against the currently identified model and
    /// issues them in order, applying each response as it arrives.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnplannableModel`] if the panel hasn't been
    /// identified as a plannable model yet (see [`wintex_core::model_for`]).
    pub async fn read_topics(&mut self, topics: Topics) -> Result<()> {
        let reads = plan(self.memory.descriptor(), topics)?;
        debug!(count = reads.len(), "planned reads");
        for (base, size) in reads {
            // size is always <= 64 by construction of `plan`, so this cast
            // never truncates.
            #[allow(clippy::cast_possible_truncation)]
            self.read_mem(base, size as u8).await?;
        }
        Ok(())
    }

    /// The memory image accumulated from this client's reads so far.
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Consumes the client, returning its accumulated memory image.
    #[must_use]
    pub fn into_memory(self) -> Memory {
        self.memory
    }

    async fn send(&mut self, payload: &[u8]) -> Result<()> {
        let framed = wintex_proto::frame(payload)?;
        self.stream.write_all(&framed).await?;
        Ok(())
    }

    async fn recv_frame(&mut self) -> Result<Message> {
        let mut len_byte = [0u8; 1];
        self.stream.read_exact(&mut len_byte).await?;
        let declared = len_byte[0] as usize;
        if declared < wintex_proto::MIN_FRAME_LEN {
            return Err(CoreError::Transport(format!(
                "frame length {declared} below minimum"
            )));
        }

        let mut rest = vec![0u8; declared - 1];
        self.stream.read_exact(&mut rest).await?;

        let mut full = Vec::with_capacity(declared);
        full.push(len_byte[0]);
        full.extend_from_slice(&rest);

        if !verify(&full)? {
            return Err(CoreError::Transport("checksum mismatch on reply".to_string()));
        }
        Ok(Message::parse(&full[1..declared - 1])?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;

    /// Drives a minimal fake panel over a loopback socket far enough to
    /// exercise the handshake and a single memory read. Runs under paused
    /// virtual time so the settle delay doesn't make the test slow.
    #[tokio::test(start_paused = true)]
    async fn connect_and_read_mem_against_a_fake_panel() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();

            // Z -> serial challenge
            let mut login = [0u8; 3];
            sock.read_exact(&mut login).await.unwrap();
            let mut serial_body = vec![0x05u8];
            serial_body.extend_from_slice(&[0x12, 0x34, 0x56, 0x70, 0x00, 0x00, 0x00]);
            let frame = wintex_proto::frame(&[b"Z".as_slice(), &serial_body].concat()).unwrap();
            sock.write_all(&frame).await.unwrap();

            // Z<password> -> banner
            let mut len_byte = [0u8; 1];
            sock.read_exact(&mut len_byte).await.unwrap();
            let mut rest = vec![0u8; len_byte[0] as usize - 1];
            sock.read_exact(&mut rest).await.unwrap();
            let banner_frame = wintex_proto::frame(b"ZElite 24    V6.05.03").unwrap();
            sock.write_all(&banner_frame).await.unwrap();

            // O request -> I response
            let mut req_len = [0u8; 1];
            sock.read_exact(&mut req_len).await.unwrap();
            let mut req_rest = vec![0u8; req_len[0] as usize - 1];
            sock.read_exact(&mut req_rest).await.unwrap();
            let mut reply_body = vec![b'I', 0x00, 0x00, 0x10, 4];
            reply_body.extend_from_slice(&[9, 9, 9, 9]);
            let reply_frame = wintex_proto::frame(&reply_body).unwrap();
            sock.write_all(&reply_frame).await.unwrap();
        });

        let mut client = UdlClient::connect(addr, "hunter2").await.unwrap();
        assert_eq!(client.memory().banner(), "Elite 24    V6.05.03");

        let data = client.read_mem(0x10, 4).await.unwrap();
        assert_eq!(data, vec![9, 9, 9, 9]);
        assert_eq!(&client.memory().mem()[0x10..0x14], &[9, 9, 9, 9]);

        server.await.unwrap();
    }
}
