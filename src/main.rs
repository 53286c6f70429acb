//! hae CLI - Entry point
//!
//! Usage: hae <command> [options]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hae::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("hae=debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Some(path) = &cli.config {
        std::env::set_var("HAE_CONFIG", path);
    }

    // Run command
    match cli.command {
        Commands::Chat(args) => hae::cli::chat::run(args).await,
        Commands::Networks(args) => hae::cli::networks::execute(args).await,
        Commands::Login(args) => hae::cli::login::login(args).await,
        Commands::Logout(args) => hae::cli::login::logout(args),
        Commands::Ping(args) => hae::cli::ping::run(args).await,
        Commands::Config(args) => hae::cli::config::run(args),
    }
}
