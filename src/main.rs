//! Nimbus virtual joystick
//!
//! Main entry point: logging setup and command dispatch.

use anyhow::Result;
use clap::Parser;

mod cli;
use cli::{Cli, Commands};

// Command handlers (split from main.rs)
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut store = commands::open_store(&cli);

    match cli.command {
        Commands::Profile(command) => commands::profile::run(&mut store, command),
        Commands::Config(command) => commands::config::run(&mut store, command),
        Commands::Curve {
            role,
            component,
            steps,
        } => commands::curve::run(&store, &role, component, steps),
        Commands::Run {
            dry_run,
            device_name,
        } => commands::run::run(store, dry_run, &device_name).await,
    }
}
