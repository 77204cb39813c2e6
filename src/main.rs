//! Blu-ray disc scanner
//!
//! Discovers the BDMV structure below or around a folder, scans its
//! playlists, clips and stream files, and prints a JSON summary.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use bdrom_scan::config_file::{generate_default_config, ConfigFile};
use bdrom_scan::{BdRom, DiscSummary, HeaderDecoder, Result, ScanConfig, ScanPolicies};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "bdrom-scan";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Disc root, or a folder inside or above it
    #[arg(required_unless_present = "init_config")]
    bd_folder: Option<String>,

    /// TOML configuration file
    config: Option<String>,

    /// Write the default configuration to PATH and exit
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "bdrom-scan.toml"
    )]
    init_config: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(path) = &args.init_config {
        return match generate_default_config(path) {
            Ok(()) => {
                println!("Wrote default configuration to {}", path);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}: {}", APP_NAME, e);
                ExitCode::FAILURE
            }
        };
    }

    let Some(bd_folder) = args.bd_folder.as_deref() else {
        return ExitCode::FAILURE;
    };

    // Logging depends on the configuration, so report load errors after init
    let (config, config_error) = match args.config.as_deref() {
        Some(path) => match ConfigFile::from_file(path) {
            Ok(cf) => (cf.into_scan_config(), None),
            Err(e) => (ScanConfig::default(), Some((path, e))),
        },
        None => (ScanConfig::default(), None),
    };

    init_logging(&config);
    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    if let Some((path, e)) = config_error {
        tracing::warn!("Failed to load config file {}: {}. Using defaults.", path, e);
    }
    tracing::debug!("Configuration loaded: {:?}", config);

    match run(bd_folder, &config) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Scan of {} failed: {}", bd_folder, e);
            ExitCode::FAILURE
        }
    }
}

fn run(bd_folder: &str, config: &ScanConfig) -> Result<String> {
    let mut disc = BdRom::open(bd_folder, config)?;
    let mut policies = ScanPolicies::from_config(&config.recovery);
    let report = disc.scan(&mut policies, &mut HeaderDecoder)?;

    DiscSummary::new(&disc, &report).to_json()
}

/// Initialize logging with tracing. Logs go to stderr; stdout carries the
/// summary.
fn init_logging(config: &ScanConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_filter().into());
    let json = config.log_format == "json";

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["bdrom-scan", "/discs/MOVIE", "scan.toml"]).unwrap();
        assert_eq!(args.bd_folder.as_deref(), Some("/discs/MOVIE"));
        assert_eq!(args.config.as_deref(), Some("scan.toml"));
        assert_eq!(args.init_config, None);

        let args = Args::try_parse_from(["bdrom-scan", "--init-config"]).unwrap();
        assert_eq!(args.init_config.as_deref(), Some("bdrom-scan.toml"));

        let args = Args::try_parse_from(["bdrom-scan", "--init-config", "my.toml"]).unwrap();
        assert_eq!(args.init_config.as_deref(), Some("my.toml"));

        assert!(Args::try_parse_from(["bdrom-scan"]).is_err());
    }
}
