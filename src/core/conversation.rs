//! Conversation engine
//!
//! Owns the transcript and turns one submission into the right
//! downstream call. The user's message is appended before any network
//! round-trip so the view stays responsive; completions land in
//! arrival order, which may differ from submission order when calls
//! overlap.

use std::sync::{Arc, Mutex};

use tracing::{error, info};

use super::backend::MemoryBackend;
use super::classifier::{Action, ActionClassifier};
use super::entity::EntityStore;
use super::facts::FactStore;
use super::lock;
use super::notice::NoticeQueue;
use crate::remote::types::{Message, QueryRequest};

/// Synthetic greeting seeding every new transcript
pub const GREETING: &str = "Hey there 🌞";

pub struct ConversationEngine {
    backend: Arc<dyn MemoryBackend>,
    messages: Mutex<Vec<Message>>,
}

impl ConversationEngine {
    pub fn new(backend: Arc<dyn MemoryBackend>) -> Self {
        Self { backend, messages: Mutex::new(vec![Message::assistant(GREETING)]) }
    }

    /// Snapshot of the transcript, greeting included
    pub fn transcript(&self) -> Vec<Message> {
        lock(&self.messages).clone()
    }

    /// Process one submission. Empty input is ignored. Returns the
    /// action taken, if any; errors surface as notices rather than
    /// return values so the session stays interactive.
    pub async fn submit(
        &self,
        input: &str,
        classifier: &ActionClassifier,
        entities: &EntityStore,
        facts: &FactStore,
        notices: &NoticeQueue,
    ) -> Option<Action> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        // Classification happens before the user message is appended;
        // the transcript sent with a query is the prior conversation.
        let action = classifier.resolve(self.backend.as_ref(), input).await;
        let prior = self.transcript();
        lock(&self.messages).push(Message::user(input));

        match action {
            Action::Save => {
                let nid = entities.selected().map(|n| n.nid);
                match facts.save(nid, input).await {
                    Ok(outcome) => {
                        info!(created = outcome.created_network, "information saved");
                        notices.info("Information saved.");
                        // A save may have materialized a new network.
                        if let Err(err) = entities.refresh().await {
                            notices.error(err.alert("fetching networks"));
                        }
                    }
                    Err(err) => {
                        error!(error = %err, "save failed");
                        notices.error(err.alert("saving information"));
                    }
                }
            }
            Action::Ask => {
                let selected = entities.selected();
                let req = QueryRequest {
                    query: input.to_string(),
                    name: selected.as_ref().map(|n| n.name.clone()).unwrap_or_default(),
                    nid: selected.as_ref().map(|n| n.nid).unwrap_or(0),
                    messages: prior,
                };
                match self.backend.query(&req).await {
                    Ok(resp) => {
                        lock(&self.messages).push(Message::assistant(resp.answer));
                    }
                    Err(err) => {
                        // No assistant reply on failure; the notice is
                        // the only user-visible trace.
                        error!(error = %err, "query failed");
                        notices.error(err.alert("answering question"));
                    }
                }
            }
        }

        Some(action)
    }
}
