use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use outbreak_loader::{Config, Loader};

#[derive(Debug, Parser)]
#[command(name = "outbreak-loader", version, about = "Load outbreak snapshot files into SQLite")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory with the press-release file and snapshot dumps
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// SQLite database to (re)build
    #[arg(long)]
    database: Option<PathBuf>,

    /// Administrative-boundary CSV
    #[arg(long)]
    boundaries: Option<PathBuf>,

    /// Update mode instead of a full rebuild
    #[arg(long)]
    update: bool,

    /// Log every statement
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(db) = self.database {
            config.db_path = db;
        }
        if let Some(path) = self.boundaries {
            config.boundary_path = path;
        }
        if self.update {
            config.first_run = false;
        }
        if self.verbose {
            config.verbose = true;
        }
    }
}

/// `RUST_LOG` wins when set; otherwise `verbose` picks debug (every
/// statement) or info.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("Ignoring invalid RUST_LOG {:?}: {}", directives, e),
        }
    }

    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    EnvFilter::default().add_directive(level.into())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_file =
        Config::resolve_path(cli.config.as_deref()).context("Failed to load configuration")?;
    let mut config =
        Config::from_file(config_file.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);

    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref(), config.verbose))
        .with_writer(std::io::stderr)
        .init();

    match &config_file {
        Some(path) => tracing::debug!("Loaded configuration from {}", path.display()),
        None => tracing::debug!("No configuration file found, using defaults"),
    }

    let loader = Loader::open(config).await?;
    let result = loader.run().await;
    loader.close().await?;

    if let Some(report) = result? {
        println!("Loaded {}", report);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_overrides_verbose() {
        let filter = log_filter(Some("warn"), true);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn verbose_selects_level_without_rust_log() {
        assert_eq!(log_filter(None, true).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(Some(""), false).max_level_hint(), Some(LevelFilter::INFO));
    }
}
