//! UDL client: connects to a panel over TCP, performs the login handshake,
//! and drives planned reads into a reconstructed memory image.

mod client;

pub use client::UdlClient;
