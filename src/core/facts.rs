//! Fact store
//!
//! Holds the contents of whichever network is currently being viewed
//! in the fact overlay, which is tracked independently of the
//! conversational selection. Same generation guard as the entity
//! store.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::backend::MemoryBackend;
use super::lock;
use crate::remote::error::ApiResult;
use crate::remote::types::{Content, SaveRequest};

#[derive(Default)]
struct FactState {
    viewed_network: Option<i64>,
    contents: Vec<Content>,
    generation: u64,
    inflight: u32,
}

/// Result of a successful save
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub message: String,
    /// True when no network id was supplied, meaning the server
    /// inferred or created one from the text
    pub created_network: bool,
}

pub struct FactStore {
    backend: Arc<dyn MemoryBackend>,
    state: Mutex<FactState>,
}

impl FactStore {
    pub fn new(backend: Arc<dyn MemoryBackend>) -> Self {
        Self { backend, state: Mutex::new(FactState::default()) }
    }

    pub fn viewed_network(&self) -> Option<i64> {
        lock(&self.state).viewed_network
    }

    pub fn contents(&self) -> Vec<Content> {
        lock(&self.state).contents.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).inflight > 0
    }

    /// Start viewing a network's facts. The viewed id is set before
    /// the fetch resolves so the overlay can open regardless; on
    /// failure the collection is empty and the error is returned for
    /// surfacing.
    pub async fn view(&self, nid: i64) -> ApiResult<()> {
        let gen = {
            let mut state = lock(&self.state);
            state.viewed_network = Some(nid);
            state.contents.clear();
            state.generation += 1;
            state.inflight += 1;
            state.generation
        };

        let result = self.backend.list_contents(nid).await;

        let mut state = lock(&self.state);
        state.inflight = state.inflight.saturating_sub(1);

        match result {
            Ok(contents) => {
                if state.generation != gen {
                    debug!(gen, current = state.generation, "discarding stale content list");
                    return Ok(());
                }
                state.contents = contents;
                Ok(())
            }
            Err(err) => {
                warn!(nid, error = %err, "failed to fetch network contents");
                Err(err)
            }
        }
    }

    /// Stop viewing; must be called when the fact overlay closes so a
    /// later delete cannot target the wrong network.
    pub fn clear_view(&self) {
        let mut state = lock(&self.state);
        state.viewed_network = None;
        state.contents.clear();
        state.generation += 1;
    }

    /// Persist a fact. With no `nid` the server infers or creates the
    /// network; the caller reacts by refreshing the entity store.
    pub async fn save(&self, nid: Option<i64>, text: &str) -> ApiResult<SaveOutcome> {
        let req = SaveRequest { nid, text: text.to_string() };
        let resp = self.backend.save(&req).await?;
        Ok(SaveOutcome { message: resp.message, created_network: nid.is_none() })
    }

    /// Update a content's text. Empty or unchanged text is a silent
    /// no-op (returns false, no request). On success the local copy
    /// takes the server's returned text, which is authoritative in
    /// case normalization occurred.
    pub async fn update(&self, nid: i64, cid: i64, new_text: &str) -> ApiResult<bool> {
        if new_text.trim().is_empty() {
            return Ok(false);
        }
        {
            let state = lock(&self.state);
            let unchanged = state.viewed_network == Some(nid)
                && state.contents.iter().any(|c| c.cid == cid && c.content == new_text);
            if unchanged {
                return Ok(false);
            }
        }

        let updated = self.backend.update_content(nid, cid, new_text).await?;

        let mut state = lock(&self.state);
        state.generation += 1;
        if state.viewed_network == Some(nid) {
            if let Some(c) = state.contents.iter_mut().find(|c| c.cid == cid) {
                c.content = updated.content.clone();
                c.created_at = updated.created_at.clone();
            }
        }
        Ok(true)
    }

    /// Delete a content of the currently viewed network. Logs and
    /// no-ops when no network is being viewed.
    pub async fn delete_viewed(&self, cid: i64) -> ApiResult<bool> {
        let nid = match self.viewed_network() {
            Some(nid) => nid,
            None => {
                warn!(cid, "no viewed network; refusing content delete");
                return Ok(false);
            }
        };

        self.backend.delete_content(nid, cid).await?;

        let mut state = lock(&self.state);
        state.generation += 1;
        state.contents.retain(|c| c.cid != cid);
        Ok(true)
    }
}
