//! `hae networks` command
//!
//! Manage networks and their saved contents.
//!
//! # Usage
//! ```bash
//! hae networks list                        # List all networks
//! hae networks rename 3 "John Smith"       # Rename a network
//! hae networks delete 3                    # Delete a network
//! hae networks contents 3                  # List saved facts
//! hae networks edit-content 3 7 "new text" # Rewrite one fact
//! hae networks delete-content 3 7          # Delete one fact
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{build_client, print_notices, ServerArgs};
use crate::config::Config;
use crate::core::classifier::ClassifierMode;
use crate::core::edit::{CommitTrigger, EditTarget};
use crate::core::session::Session;

#[derive(Args, Debug)]
pub struct NetworksArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(subcommand)]
    pub command: NetworksCommands,
}

#[derive(Subcommand, Debug)]
pub enum NetworksCommands {
    /// List all networks
    List,

    /// Rename a network
    Rename {
        /// Network id
        nid: i64,

        /// New name
        name: String,
    },

    /// Delete a network and everything saved in it
    Delete {
        /// Network id
        nid: i64,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// List the contents saved in a network
    Contents {
        /// Network id
        nid: i64,
    },

    /// Rewrite one saved content
    EditContent {
        /// Network id
        nid: i64,

        /// Content id
        cid: i64,

        /// Replacement text
        text: String,
    },

    /// Delete one saved content
    DeleteContent {
        /// Network id
        nid: i64,

        /// Content id
        cid: i64,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "ID")]
    nid: i64,

    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct ContentRow {
    #[tabled(rename = "ID")]
    cid: i64,

    #[tabled(rename = "Content")]
    content: String,

    #[tabled(rename = "Created")]
    created_at: String,
}

/// Execute networks command
pub async fn execute(args: NetworksArgs) -> Result<()> {
    let config = Config::load()?;
    let (_, client) = build_client(&args.server, &config)?;
    let session = Session::new(Arc::new(client), ClassifierMode::Explicit);
    session.start().await;

    let result = match &args.command {
        NetworksCommands::List => list(&session),
        NetworksCommands::Rename { nid, name } => rename(&session, *nid, name).await,
        NetworksCommands::Delete { nid, force } => delete(&session, *nid, *force).await,
        NetworksCommands::Contents { nid } => contents(&session, *nid).await,
        NetworksCommands::EditContent { nid, cid, text } => {
            edit_content(&session, *nid, *cid, text).await
        }
        NetworksCommands::DeleteContent { nid, cid, force } => {
            delete_content(&session, *nid, *cid, *force).await
        }
    };

    print_notices(&session.notices);
    result
}

fn list(session: &Session) -> Result<()> {
    let networks = session.entities.networks();

    if networks.is_empty() {
        println!("No networks found.");
        println!("\nSave something in chat to create one: hae chat");
        return Ok(());
    }

    let rows: Vec<NetworkRow> = networks
        .iter()
        .map(|n| NetworkRow { nid: n.nid, name: n.name.clone() })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    println!("{} network(s)", networks.len());
    Ok(())
}

async fn rename(session: &Session, nid: i64, name: &str) -> Result<()> {
    let old = session
        .entities
        .networks()
        .into_iter()
        .find(|n| n.nid == nid)
        .ok_or_else(|| anyhow::anyhow!("No network with id {}", nid))?;

    session.begin_edit(EditTarget::NetworkName { nid }, &old.name);
    session.set_edit_buffer(name);

    if session.commit_edit(CommitTrigger::Confirm).await {
        println!("{} Renamed '{}' to '{}'", "✓".green(), old.name, name.cyan().bold());
    } else if session.notices.is_empty() {
        println!("Nothing to change.");
    }
    Ok(())
}

async fn delete(session: &Session, nid: i64, force: bool) -> Result<()> {
    let network = session
        .entities
        .networks()
        .into_iter()
        .find(|n| n.nid == nid)
        .ok_or_else(|| anyhow::anyhow!("No network with id {}", nid))?;

    if !force {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Delete '{}' and everything saved in it? This cannot be undone.",
                network.name.red()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if session.delete_network(nid).await {
        println!("{} Deleted network: {}", "✓".green(), network.name);
    }
    Ok(())
}

async fn contents(session: &Session, nid: i64) -> Result<()> {
    session.open_content_overlay("cli", nid).await;
    let contents = session.facts.contents();
    session.close_content_overlay();

    if contents.is_empty() {
        println!("Nothing saved in network {}.", nid);
        return Ok(());
    }

    let rows: Vec<ContentRow> = contents
        .iter()
        .map(|c| ContentRow {
            cid: c.cid,
            content: c.content.clone(),
            created_at: c.created_at.clone(),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    println!("{} item(s)", contents.len());
    Ok(())
}

async fn edit_content(session: &Session, nid: i64, cid: i64, text: &str) -> Result<()> {
    session.open_content_overlay("cli", nid).await;

    let result = match session.facts.contents().into_iter().find(|c| c.cid == cid) {
        Some(old) => {
            session.begin_edit(EditTarget::ContentText { nid, cid }, &old.content);
            session.set_edit_buffer(text);

            if session.commit_edit(CommitTrigger::Confirm).await {
                println!("{} Updated content {}", "✓".green(), cid);
            } else if session.notices.is_empty() {
                println!("Nothing to change.");
            }
            Ok(())
        }
        None => Err(anyhow::anyhow!("No content with id {} in network {}", cid, nid)),
    };

    session.close_content_overlay();
    result
}

async fn delete_content(session: &Session, nid: i64, cid: i64, force: bool) -> Result<()> {
    if !force {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete content {}? This cannot be undone.", cid))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    session.open_content_overlay("cli", nid).await;
    let deleted = session.delete_viewed_content(cid).await;
    session.close_content_overlay();

    if deleted {
        println!("{} Deleted content {}", "✓".green(), cid);
    }
    Ok(())
}
