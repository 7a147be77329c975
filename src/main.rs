//! RegionPulse - per-region telemetry aggregation service
//!
//! A single-endpoint HTTP service that filters a static latency/uptime
//! telemetry snapshot by region and returns summary statistics
//! (mean latency, p95 latency, mean uptime, threshold breaches).
//!
//! Exit codes:
//!   0 - Clean shutdown (or --check-data / --init-config success)
//!   1 - Runtime error (bad bind address, config parse failure, etc.)

mod analysis;
mod cli;
mod config;
mod data;
mod models;
mod server;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use models::TelemetrySnapshot;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("RegionPulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Startup failed: {}", e);
            eprintln!("\nError: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .regionpulse.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".regionpulse.toml");

    if path.exists() {
        eprintln!(".regionpulse.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .regionpulse.toml")?;

    println!("Created .regionpulse.toml with default settings.");
    println!("Edit it to customize the bind address, CORS, and data path.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load config, load the snapshot, and serve. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Load the telemetry snapshot once; it stays immutable for the
    // lifetime of the process.
    let data_path = PathBuf::from(&config.data.path);
    let snapshot = data::load_snapshot(&data_path);

    if snapshot.is_empty() {
        warn!(
            "No telemetry records available from {}; aggregation requests will \
             receive an error payload",
            data_path.display()
        );
    }

    // Handle --check-data: report snapshot contents and exit
    if args.check_data {
        return handle_check_data(&snapshot, &data_path);
    }

    server::serve(&config, Arc::new(snapshot)).await?;
    Ok(0)
}

/// Handle --check-data: print per-region record counts, exit.
fn handle_check_data(snapshot: &TelemetrySnapshot, data_path: &PathBuf) -> Result<i32> {
    println!("Checking telemetry data: {}\n", data_path.display());

    if snapshot.is_empty() {
        println!("  No records loaded.");
        return Ok(0);
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in snapshot.records() {
        *counts.entry(record.region.as_str()).or_default() += 1;
    }

    println!(
        "  {} records across {} region(s):\n",
        snapshot.len(),
        counts.len()
    );
    for (region, count) in &counts {
        println!("    {}: {} records", region, count);
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .regionpulse.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
