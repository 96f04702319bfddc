//! CLI entry point for the portal exporter.

use anyhow::Result;
use clap::Parser;
use portal_export::Config;
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Pick up credentials from a .env file when present.
    if dotenvy::dotenv().is_ok() {
        debug!(".env file loaded");
    }

    let config = Config::from_env()?;
    debug!(?config, "configuration resolved");
    info!("Portal export starting");

    portal_export::run(&config).await?;

    info!("Portal export finished");
    Ok(())
}
