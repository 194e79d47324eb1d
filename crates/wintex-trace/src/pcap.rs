//! pcapng capture ingest: demultiplexes TCP segments on the UDL port into
//! the two observer directions.
//!
//! Assumes a single UDL frame never straddles a TCP segment boundary - if a
//! capture violates that, bytes simply arrive split across two `feed` calls,
//! which the underlying framer tolerates (it buffers partial frames).

use std::io::Read;

use etherparse::{SlicedPacket, TransportSlice};

use crate::{error::TraceError, ingest::TraceIngest};

/// Reads every packet from a pcapng capture, dispatching TCP payloads on
/// `udl_port` by direction into a fresh [`TraceIngest`].
///
/// Segments with the UDL port as their destination are client→server
/// traffic and feed the password observer; segments with the UDL port as
/// their source are server→client traffic and feed the panel observer.
///
/// # Errors
///
/// Returns [`TraceError::Pcap`] if the container is malformed, or
/// [`TraceError::Core`] if a direction's framer rejects a frame.
pub fn ingest<R: Read>(reader: R, udl_port: u16) -> Result<TraceIngest, TraceError> {
    let mut capture = pcarp::Capture::new(reader);
    let mut trace = TraceIngest::new();

    while let Some(packet) = capture.next_packet()? {
        let Ok(sliced) = SlicedPacket::from_ethernet(packet.data) else { continue };
        let Some(TransportSlice::Tcp(tcp)) = sliced.transport else { continue };

        let payload = sliced.payload;
        if payload.is_empty() {
            continue;
        }

        if tcp.destination_port() == udl_port {
            trace.feed_client(payload)?;
        } else if tcp.source_port() == udl_port {
            trace.feed_panel(payload)?;
        }
    }

    Ok(trace)
}
