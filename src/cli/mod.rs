//! CLI module - Command definitions and handlers

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::auth::StoredAuth;
use crate::config::Config;
use crate::core::notice::NoticeQueue;
use crate::remote::ApiClient;

pub mod chat;
pub mod config;
pub mod login;
pub mod networks;
pub mod ping;

/// hae - Personal memory assistant
///
/// Chat with your own memory: save facts about the people in your life
/// and ask questions about them later.
#[derive(Parser, Debug)]
#[command(name = "hae")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, env = "HAE_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session
    Chat(chat::ChatArgs),

    /// Manage networks and their contents
    Networks(networks::NetworksArgs),

    /// Store sign-in credentials
    Login(login::LoginArgs),

    /// Clear stored credentials
    Logout(login::LogoutArgs),

    /// Test connection to server
    Ping(ping::PingArgs),

    /// Get or set configuration
    Config(config::ConfigArgs),
}

/// Flags shared by every server-backed command
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Server URL (overrides config)
    #[arg(long, env = "HAE_SERVER_URL")]
    pub server_url: Option<String>,

    /// Auth token (overrides config)
    #[arg(long, env = "HAE_TOKEN")]
    pub token: Option<String>,
}

/// Build auth provider + API client from args + config
pub(crate) fn build_client(args: &ServerArgs, config: &Config) -> Result<(Arc<StoredAuth>, ApiClient)> {
    let mut server = config.server.clone();
    if let Some(url) = &args.server_url {
        server.url = Some(url.clone());
    }

    let mut auth_config = config.auth.clone();
    if let Some(token) = &args.token {
        auth_config.token = Some(token.clone());
    }

    let auth = Arc::new(StoredAuth::from_config(&auth_config));
    let client = ApiClient::from_config(&server, auth.clone())?;
    Ok((auth, client))
}

/// Print and clear pending session notices
pub(crate) fn print_notices(notices: &NoticeQueue) {
    for notice in notices.drain() {
        if notice.is_error() {
            eprintln!("{}", notice.text().red());
        } else {
            println!("{}", notice.text().green());
        }
    }
}
