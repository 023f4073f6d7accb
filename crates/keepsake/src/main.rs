// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keepsake - inspect, check and upgrade a companion app's record store.

mod check;
mod migrate;
mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

use keepsake_config::KeepsakeConfig;

/// Keepsake - inspect, check and upgrade a record store.
#[derive(Parser, Debug)]
#[command(name = "keepsake", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the usual locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load every record and report quarantines, repairs and warnings.
    Check {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show storage usage and entity counts.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Rewrite every outdated record at the current schema version.
    Migrate {
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => keepsake_config::load_and_validate_path(path),
        None => keepsake_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            keepsake_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let result = match cli.command {
        Commands::Check { json } => check::run_check(&config, json).await,
        Commands::Stats { json } => stats::run_stats(&config, json).await,
        Commands::Migrate { json } => migrate::run_migrate(&config, json).await,
        Commands::Config => print_config(&config),
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn print_config(config: &KeepsakeConfig) -> Result<(), keepsake_core::KeepsakeError> {
    let rendered = config
        .to_toml_string()
        .map_err(|e| keepsake_core::KeepsakeError::Config(e.to_string()))?;
    print!("{rendered}");
    Ok(())
}

/// Log to stderr. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keepsake={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommands_and_global_config() {
        let cli = Cli::try_parse_from(["keepsake", "stats", "--json", "--config", "k.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Stats { json: true }));
        assert_eq!(cli.config, Some(PathBuf::from("k.toml")));

        let cli = Cli::try_parse_from(["keepsake", "check"]).unwrap();
        assert!(matches!(cli.command, Commands::Check { json: false }));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["keepsake"]).is_err());
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = keepsake_config::load_and_validate_str("").unwrap();
        assert_eq!(config.log.level, "info");
    }
}
