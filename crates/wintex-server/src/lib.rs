//! UDL replay server (C9): listens for incoming connections and impersonates
//! a panel from a reconstructed [`wintex_core::Memory`] image, servicing
//! reads and writes without talking to real hardware.

mod connection;
mod handler;
mod server_error;

pub use connection::serve;
pub use handler::PanelHandler;
pub use server_error::ServerError;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use tokio::net::TcpListener;
use tracing::{info, warn};
use wintex_core::Memory;

/// Accepts connections on `bind`, serving each one from its own clone of
/// `template` until the listener is closed or an accept fails.
///
/// Each connection is assigned a connection id from a counter owned by this
/// loop, starting at 1 and incrementing per accepted connection - this
/// replaces any notion of a process-wide connection counter with one scoped
/// to a single server run.
///
/// If `panel_path` is set, the memory image is re-saved to it after every
/// connection closes, so writes a session made persist across restarts.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the listener can't be bound.
pub async fn run(
    bind: SocketAddr,
    template: Memory,
    panel_path: Option<PathBuf>,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(bind).await.map_err(|source| ServerError::Bind { source })?;
    info!(%bind, "listening");

    let panel_path = panel_path.map(Arc::new);
    let mut next_conn_id: u64 = 1;
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!(%err, "accept failed");
                continue;
            },
        };
        let conn_id = next_conn_id;
        next_conn_id += 1;
        info!(conn_id, %peer, "accepted connection");

        let connection_memory = template.clone();
        let panel_path = panel_path.clone();
        tokio::spawn(async move {
            let final_memory = serve(stream, connection_memory, conn_id).await;
            if let Some(path) = panel_path {
                let bytes = wintex_core::persist::save(&final_memory);
                if let Err(err) = tokio::fs::write(path.as_ref(), &bytes).await {
                    warn!(conn_id, %err, "failed to persist panel snapshot");
                }
            }
        });
    }
}
