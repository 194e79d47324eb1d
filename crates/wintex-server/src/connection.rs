//! Per-connection driver: frames raw bytes off a socket, hands each message
//! to a [`PanelHandler`], and writes back whatever framed replies fall out.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{info, instrument, warn};
use wintex_core::Memory;
use wintex_proto::Framer;

use crate::handler::PanelHandler;

/// Services one accepted connection to completion (EOF or I/O error),
/// returning the memory image it ended up with.
///
/// `conn_id` is assigned by the caller from a counter owned by the server's
/// accept loop, not a process-wide global - each connection's identifier is
/// local to this run of the server.
#[instrument(skip(stream, template))]
pub async fn serve(mut stream: tokio::net::TcpStream, template: Memory, conn_id: u64) -> Memory {
    let mut handler = PanelHandler::new(template, conn_id);
    let mut framer = Framer::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) => {
                info!(conn_id, "connection closed");
                break;
            },
            Ok(n) => n,
            Err(err) => {
                warn!(conn_id, %err, "read error");
                break;
            },
        };

        let messages = match framer.feed(&buf[..n]) {
            Ok(messages) => messages,
            Err(err) => {
                warn!(conn_id, %err, "framing error, dropping connection");
                break;
            },
        };

        for message in &messages {
            let Some(body) = handler.handle(message) else { continue };
            let framed = match wintex_proto::frame(&body) {
                Ok(framed) => framed,
                Err(err) => {
                    warn!(conn_id, %err, "failed to frame reply");
                    continue;
                },
            };
            if let Err(err) = stream.write_all(&framed).await {
                warn!(conn_id, %err, "write error");
                return handler.memory().clone();
            }
        }
    }

    handler.memory().clone()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use tokio::net::{TcpListener, TcpStream};
    use wintex_core::Memory;

    use super::*;

    #[tokio::test]
    async fn heartbeat_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut memory = Memory::new();
        memory.set_banner("Elite 24    V6.05.03").unwrap();

        let server = tokio::spawn(async move {
            let (sock, _) = listener.accept().await.unwrap();
            serve(sock, memory, 1).await
        });

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(&wintex_proto::frame(b"P").unwrap()).await.unwrap();

        let mut reply = [0u8; 5];
        client.read_exact(&mut reply).await.unwrap();
        assert_eq!(reply.to_vec(), wintex_proto::frame(&[b'P', 0xFF, 0xFF]).unwrap());

        drop(client);
        server.await.unwrap();
    }
}
