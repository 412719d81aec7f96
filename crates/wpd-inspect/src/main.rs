//! WPD Inspect - Dump a captured command mapping
//!
//! Reads a CBOR-encoded request or response mapping, classifies its status,
//! and prints every entry through the variant debug renderer.

mod config;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;
use wpd_command::{dump, wire};

#[derive(Parser, Debug)]
#[command(name = "wpd-inspect")]
#[command(about = "Decode and dump captured WPD command mappings")]
#[command(version)]
struct Args {
    /// CBOR file holding one encoded property mapping
    file: PathBuf,

    /// Path to configuration file
    #[arg(short, long, default_value = "wpd-inspect.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Print a JSON document instead of text
    #[arg(long)]
    json: bool,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Config comes first since it may choose the log level
    let loaded = config::load_config(&args.config)?;
    let found = loaded.is_some();
    let config = loaded.unwrap_or_default();

    let level = parse_level(args.log_level.as_deref().unwrap_or(&config.logging.level));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("wpd-inspect v{}", env!("CARGO_PKG_VERSION"));
    config::log_loaded(&args.config, found.then_some(&config));

    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let values = wire::decode_values(&bytes)
        .with_context(|| format!("Failed to decode {}", args.file.display()))?;
    debug!(entries = values.len(), bytes = bytes.len(), "Decoded mapping");

    dump::trace_values("inspect", &values);

    let names = config.key_names();
    if args.json || config.output.json {
        println!("{}", report::render_json(&values, &names)?);
    } else {
        print!("{}", report::render_text(&values, &names));
    }

    Ok(())
}
