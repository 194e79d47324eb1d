//! End-to-end tests driving a real TCP connection against the replay
//! server's `run` loop.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use tempfile::tempdir;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};
use wintex_core::Memory;

async fn spawn_server(panel_path: Option<std::path::PathBuf>) -> std::net::SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();
    let listener = tokio::net::TcpListener::from_std(listener).unwrap();

    let mut memory = Memory::new();
    memory.set_banner("Elite 24    V6.05.03").unwrap();
    memory.set_serial("12345670000000").unwrap();
    memory.apply_write(wintex_core::Region::Mem, 0x10, 4, &[9, 9, 9, 9]).unwrap();

    tokio::spawn(async move {
        let mut next_conn_id: u64 = 1;
        loop {
            let Ok((stream, _)) = listener.accept().await else { return };
            let conn_id = next_conn_id;
            next_conn_id += 1;
            let template = memory.clone();
            let path = panel_path.clone();
            tokio::spawn(async move {
                let final_memory = wintex_server::serve(stream, template, conn_id).await;
                if let Some(path) = path {
                    let bytes = wintex_core::persist::save(&final_memory);
                    let _ = tokio::fs::write(path, &bytes).await;
                }
            });
        }
    });
    addr
}

async fn recv_frame(stream: &mut TcpStream) -> Vec<u8> {
    let mut len_byte = [0u8; 1];
    stream.read_exact(&mut len_byte).await.unwrap();
    let mut rest = vec![0u8; len_byte[0] as usize - 1];
    stream.read_exact(&mut rest).await.unwrap();
    let mut full = vec![len_byte[0]];
    full.extend(rest);
    full
}

#[tokio::test]
async fn full_login_and_read_handshake() {
    let addr = spawn_server(None).await;
    let mut client = timeout(Duration::from_secs(1), TcpStream::connect(addr)).await.unwrap().unwrap();

    client.write_all(&wintex_proto::frame(b"Z").unwrap()).await.unwrap();
    let challenge = recv_frame(&mut client).await;
    assert_eq!(challenge[1], b'Z');
    assert_eq!(challenge[2], 0x05);

    client.write_all(&wintex_proto::frame(b"Zhunter2").unwrap()).await.unwrap();
    let banner_reply = recv_frame(&mut client).await;
    assert_eq!(banner_reply[1], b'Z');
    let banner: String =
        banner_reply[2..22].iter().map(|&b| b as char).collect::<String>().trim_end_matches('\0').to_string();
    assert_eq!(banner, "Elite 24    V6.05.03");

    let mut req = vec![b'O'];
    req.extend_from_slice(&wintex_core::addr::encode_address_triple(0x10, 4));
    client.write_all(&wintex_proto::frame(&req).unwrap()).await.unwrap();
    let read_reply = recv_frame(&mut client).await;
    assert_eq!(read_reply[1], b'I');
    assert_eq!(&read_reply[6..10], &[9, 9, 9, 9]);
}

#[tokio::test]
async fn writes_persist_to_the_panel_file_after_disconnect() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("panel.bin");

    let addr = spawn_server(Some(path.clone())).await;
    let mut client = timeout(Duration::from_secs(1), TcpStream::connect(addr)).await.unwrap().unwrap();

    let mut req = vec![b'I'];
    req.extend_from_slice(&wintex_core::addr::encode_address_triple(0x20, 3));
    req.extend_from_slice(&[7, 8, 9]);
    client.write_all(&wintex_proto::frame(&req).unwrap()).await.unwrap();
    let _ack = recv_frame(&mut client).await;

    drop(client);
    // Give the spawned connection task a moment to observe EOF and persist.
    for _ in 0..50 {
        if path.exists() && std::fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let bytes = std::fs::read(&path).unwrap();
    let loaded = wintex_core::persist::load(&bytes).unwrap();
    assert_eq!(&loaded.mem()[0x20..0x23], &[7, 8, 9]);
}
