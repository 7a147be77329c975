//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// RegionPulse - per-region latency and uptime telemetry aggregation
///
/// Serves a single POST endpoint that filters a static telemetry
/// snapshot by region and returns mean latency, p95 latency, mean
/// uptime, and threshold-breach counts per region.
///
/// Examples:
///   regionpulse --data data/telemetry.json
///   regionpulse --data data/telemetry.json --bind 0.0.0.0:3000
///   regionpulse --data data/telemetry.json --check-data
///   regionpulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the telemetry snapshot JSON file
    ///
    /// A JSON array of {region, latency_ms, uptime_pct} objects. If the
    /// file is missing or malformed the server still starts and answers
    /// every aggregation request with an error payload.
    #[arg(short, long, value_name = "FILE", env = "REGIONPULSE_DATA")]
    pub data: Option<PathBuf>,

    /// Address and port to listen on
    ///
    /// Example: --bind 0.0.0.0:3000. Defaults to 127.0.0.1:8080 or the
    /// value from .regionpulse.toml.
    #[arg(short, long, value_name = "ADDR", env = "REGIONPULSE_BIND")]
    pub bind: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .regionpulse.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable permissive CORS headers
    #[arg(long)]
    pub no_cors: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Load the snapshot, print per-region record counts, and exit
    ///
    /// No server is started. Useful to verify a data file before deploying.
    #[arg(long)]
    pub check_data: bool,

    /// Generate a default .regionpulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate bind address format early, before the config merge
        if let Some(ref bind) = self.bind {
            if bind.parse::<std::net::SocketAddr>().is_err() {
                return Err(format!(
                    "Invalid bind address '{}': expected host:port (e.g. 127.0.0.1:8080)",
                    bind
                ));
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            data: Some(PathBuf::from("data/telemetry.json")),
            bind: None,
            config: None,
            no_cors: false,
            verbose: false,
            quiet: false,
            check_data: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_accepts_defaults() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_bind() {
        let mut args = make_args();
        args.bind = Some("not-an-address".to_string());
        assert!(args.validate().is_err());

        args.bind = Some("127.0.0.1:8080".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
