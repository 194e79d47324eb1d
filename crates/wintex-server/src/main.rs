//! Replay server binary: impersonates a panel from a persisted memory
//! snapshot, or a fresh one if none exists yet.
//!
//! # Usage
//!
//! ```bash
//! wintex-server --bind 0.0.0.0:10001 --banner "Elite 24    V6.05.03" --panel-file panel.bin
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wintex_core::Memory;

/// UDL replay server
#[derive(Parser, Debug)]
#[command(name = "wintex-server")]
#[command(about = "Impersonates a Wintex UDL panel from a reconstructed memory image")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:10001")]
    bind: String,

    /// Path to a persisted panel snapshot to load at startup and re-save to
    /// after each connection. Created fresh if it doesn't exist yet.
    #[arg(long)]
    panel_file: Option<PathBuf>,

    /// Banner to identify as when no panel file is present yet.
    #[arg(long, default_value = "Elite 24    V6.05.03")]
    banner: String,

    /// BCD serial to answer the login challenge with when no panel file is
    /// present yet.
    #[arg(long, default_value = "12345670000000")]
    serial: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("wintex-server starting");

    let template = load_or_init_panel(&args)?;
    tracing::info!(banner = template.banner(), "serving as panel");

    let bind = args.bind.parse()?;
    wintex_server::run(bind, template, args.panel_file).await?;
    Ok(())
}

fn load_or_init_panel(args: &Args) -> Result<Memory, Box<dyn std::error::Error>> {
    if let Some(path) = &args.panel_file {
        if path.exists() {
            let bytes = std::fs::read(path)?;
            let memory = wintex_core::persist::load(&bytes)?;
            tracing::info!(path = %path.display(), "loaded panel snapshot");
            return Ok(memory);
        }
        tracing::warn!(path = %path.display(), "no panel file yet, starting fresh");
    }

    let mut memory = Memory::new();
    memory.set_banner(args.banner.clone())?;
    memory.set_serial(args.serial.clone())?;
    Ok(memory)
}
