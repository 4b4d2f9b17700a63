//! hangar - Desktop launcher for flight-sim add-on groups
//!
//! Entry point for CLI and GUI modes.

mod cli;
mod config;
mod core;
mod gui;
mod util;

use clap::Parser;
use cli::{Args, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        tracing_subscriber::EnvFilter::new("hangar=debug,info")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    let config = match &args.config {
        Some(path) => config::load_from(path)?,
        None => config::load()?,
    };

    // Handle subcommands first
    if let Some(command) = args.command {
        return match command {
            Commands::Sync => cli::run_sync(config).await,
            Commands::Dump { pretty } => cli::run_dump(config, pretty).await,
            Commands::Pack { input, output } => cli::run_pack(&input, &output),
            Commands::Groups => cli::list_products(),
        };
    }

    // GUI mode: Start the launcher UI
    tracing::info!("Starting hangar GUI");
    gui::run(config)
}
