//! Trace ingest binary: reconstructs a panel memory image from a capture
//! and prints its decoded configuration record as JSON.
//!
//! # Usage
//!
//! ```bash
//! wintex-trace --ser2net capture.log
//! wintex-trace --pcap capture.pcapng --udl-port 10001
//! ```

use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::PathBuf,
};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wintex_core::model_for;

/// Reconstructs a panel memory image from a captured trace
#[derive(Parser, Debug)]
#[command(name = "wintex-trace")]
#[command(about = "Reconstructs panel configuration from a ser2net or pcapng capture")]
#[command(version)]
struct Args {
    /// Path to a ser2net text log
    #[arg(long, conflicts_with = "pcap")]
    ser2net: Option<PathBuf>,

    /// Path to a pcapng capture
    #[arg(long, conflicts_with = "ser2net")]
    pcap: Option<PathBuf>,

    /// TCP port the UDL service runs on, used to tell client-facing traffic
    /// apart from panel-facing traffic in a pcap capture
    #[arg(long, default_value_t = 10001)]
    udl_port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let trace = if let Some(path) = &args.ser2net {
        tracing::info!(path = %path.display(), "ingesting ser2net trace");
        let reader = BufReader::new(File::open(path)?);
        wintex_trace::ser2net::ingest(reader)?
    } else if let Some(path) = &args.pcap {
        tracing::info!(path = %path.display(), "ingesting pcapng capture");
        let reader = BufReader::new(File::open(path)?);
        wintex_trace::pcap::ingest(reader, args.udl_port)?
    } else {
        return Err("one of --ser2net or --pcap is required".into());
    };

    let memory = trace.into_memory();
    tracing::info!(banner = memory.banner(), serial = memory.serial(), "identified panel");

    let descriptor = model_for(memory.banner());
    let record = (descriptor.decode)(&descriptor, memory.mem(), memory.io());
    let json = serde_json::to_string_pretty(&record)?;
    std::io::stdout().lock().write_all(json.as_bytes())?;
    std::io::stdout().lock().write_all(b"\n")?;
    Ok(())
}
