//! `hae chat` command
//!
//! Interactive chat session against the remote memory store.
//!
//! # Usage
//! ```bash
//! hae chat                       # Chat with the configured server
//! hae chat --classifier inferred # Let the server pick save vs ask
//! ```
//!
//! Slash commands inside the session:
//! ```text
//! /networks        List networks
//! /who <name>      Select a network (no name clears the selection)
//! /mode save|ask   Set what plain input does
//! /facts           Show contents of the selected network
//! /close           Close any open picker
//! /quit            Leave the session
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

use super::{build_client, print_notices, ServerArgs};
use crate::auth::AuthProvider;
use crate::config::Config;
use crate::core::classifier::{Action, ClassifierMode};
use crate::core::session::Session;
use crate::remote::types::Role;

#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Classifier mode: explicit or inferred (overrides config)
    #[arg(long)]
    pub classifier: Option<String>,
}

pub async fn run(args: ChatArgs) -> Result<()> {
    let config = Config::load()?;
    let (auth, client) = build_client(&args.server, &config)?;

    let user = match auth.current_user() {
        Some(user) => user,
        None => anyhow::bail!(
            "Not signed in. Run `hae login <email> --token <token>` first."
        ),
    };

    let mode: ClassifierMode = args
        .classifier
        .as_deref()
        .unwrap_or(&config.chat.classifier)
        .parse()?;

    let session = Session::new(Arc::new(client), mode);
    session.start().await;
    print_notices(&session.notices);

    if !user.display_name.is_empty() {
        eprintln!("{}", format!("Signed in as {}", user.display_name).dimmed());
    }

    let mut printed = 0;
    print_new_replies(&session, &mut printed);

    loop {
        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt_label(&session))
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(command) = input.strip_prefix('/') {
            if !handle_command(&session, command).await {
                break;
            }
            print_notices(&session.notices);
            // Commands don't touch the transcript; keep the cursor in
            // sync anyway in case that changes.
            printed = session.engine.transcript().len();
            continue;
        }

        session.submit(input).await;
        print_new_replies(&session, &mut printed);
        print_notices(&session.notices);
    }

    Ok(())
}

/// Prompt shows the selection and what Enter will do
fn prompt_label(session: &Session) -> String {
    let action = match session.classifier.mode() {
        ClassifierMode::Inferred => "auto".to_string(),
        ClassifierMode::Explicit => match session.classifier.current() {
            Action::Save => "save".to_string(),
            Action::Ask => "ask".to_string(),
        },
    };

    match session.entities.selected() {
        Some(network) => format!("{} · {}", network.name, action),
        None => action,
    }
}

/// Print assistant replies added since the last call
fn print_new_replies(session: &Session, printed: &mut usize) {
    let transcript = session.engine.transcript();
    for message in &transcript[*printed..] {
        if message.role == Role::Assistant {
            println!("{}", message.content.cyan());
        }
    }
    *printed = transcript.len();
}

/// Handle a slash command; returns false when the session should end
async fn handle_command(session: &Session, command: &str) -> bool {
    let mut parts = command.splitn(2, ' ');
    let name = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or_default().trim();

    match name {
        "quit" | "exit" => return false,

        "networks" => {
            session.open_network_overlay("chat");
            let networks = session.entities.networks();
            if networks.is_empty() {
                println!("No networks yet. Save something to create one.");
            }
            let selected = session.entities.selected().map(|n| n.nid);
            for network in networks {
                let marker = if selected == Some(network.nid) { "●" } else { " " };
                println!("{} {:>4}  {}", marker, network.nid, network.name);
            }
            session.close_network_overlay();
        }

        "who" => {
            if rest.is_empty() {
                session.clear_network_selection();
                println!("Selection cleared.");
            } else {
                let found = session
                    .entities
                    .networks()
                    .into_iter()
                    .find(|n| n.name.eq_ignore_ascii_case(rest));
                match found {
                    Some(network) => {
                        session.select_network(network.nid);
                        println!("Talking about {}.", network.name.cyan().bold());
                    }
                    None => eprintln!("{}", format!("No network named '{}'", rest).red()),
                }
            }
        }

        "mode" => match rest {
            "save" => {
                session.set_action(Action::Save);
            }
            "ask" => {
                if !session.set_action(Action::Ask) {
                    eprintln!("{}", "Select a network first (/who <name>).".red());
                }
            }
            _ => eprintln!("{}", "Usage: /mode save|ask".red()),
        },

        "facts" => match session.entities.selected() {
            Some(network) => {
                session.open_content_overlay("chat", network.nid).await;
                let contents = session.facts.contents();
                if contents.is_empty() {
                    println!("Nothing saved about {} yet.", network.name);
                }
                for content in contents {
                    println!("{:>4}  {}", content.cid, content.content);
                }
                session.close_content_overlay();
            }
            None => eprintln!("{}", "Select a network first (/who <name>).".red()),
        },

        // Closes pickers only; the conversational selection is
        // cleared with /who.
        "close" => {
            session.close_network_overlay();
            session.close_content_overlay();
        }

        "help" => {
            println!("/networks  /who <name>  /mode save|ask  /facts  /close  /quit");
        }

        other => eprintln!("{}", format!("Unknown command: /{}", other).red()),
    }

    true
}
