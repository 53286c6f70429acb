//! `hae login` / `hae logout` commands
//!
//! Credentials are issued by the Hae app and stored in the global
//! config; every request then carries the token as a bearer.
//!
//! # Usage
//! ```bash
//! hae login me@example.com --token <token>
//! hae logout
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{build_client, ServerArgs};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Account email
    pub email: String,

    /// Display name shown in chat
    #[arg(long)]
    pub display_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn login(args: LoginArgs) -> Result<()> {
    let token = args.server.token.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "No token provided. Pass --token or set HAE_TOKEN.\n\
             Tokens are issued in the Hae app under Settings > API."
        )
    })?;

    let mut config = Config::load()?;
    if let Some(url) = &args.server.server_url {
        config.server.url = Some(url.clone());
    }
    config.auth.token = Some(token);
    config.auth.email = Some(args.email.clone());
    config.auth.display_name = args.display_name.clone();

    // Verify the credentials before persisting them
    if config.server.url.is_some() {
        let (_, client) = build_client(&args.server, &config)?;
        eprint!("Checking server... ");
        match client.health().await {
            Ok(_) => eprintln!("{}", "OK".green().bold()),
            Err(err) => {
                eprintln!("{}", "unreachable".yellow());
                eprintln!("  {}", err);
            }
        }
    }

    let path = Config::global_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    config.save_to(&path)?;

    println!("{} Signed in as {}", "✓".green(), args.email.cyan().bold());
    println!("  Saved to: {}", path.display());
    Ok(())
}

pub fn logout(_args: LogoutArgs) -> Result<()> {
    let mut config = Config::load()?;

    if config.auth.token.is_none() {
        println!("Not signed in.");
        return Ok(());
    }

    let email = config.auth.email.take().unwrap_or_default();
    config.auth.token = None;
    config.auth.display_name = None;
    config.auth.uid = None;

    let path = Config::global_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    config.save_to(&path)?;

    if email.is_empty() {
        println!("{} Signed out", "✓".green());
    } else {
        println!("{} Signed out {}", "✓".green(), email);
    }
    Ok(())
}
