//! `hae ping` command
//!
//! Test connection to the server.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{build_client, ServerArgs};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct PingArgs {
    #[command(flatten)]
    pub server: ServerArgs,
}

pub async fn run(args: PingArgs) -> Result<()> {
    let config = Config::load()?;
    let (_, client) = build_client(&args.server, &config)?;

    eprint!("Connecting to server... ");
    let health = client.health().await?;

    println!("{}", "OK".green().bold());
    println!("  Status:  {}", health.status);
    if !health.version.is_empty() {
        println!("  Version: {}", health.version);
    }

    Ok(())
}
