//! Trace ingest (C10): reconstructs a panel [`wintex_core::Memory`] image
//! from a captured ser2net text log or pcapng network capture, without ever
//! opening a live connection.

mod error;
mod ingest;
pub mod pcap;
pub mod ser2net;

pub use error::TraceError;
pub use ingest::TraceIngest;
