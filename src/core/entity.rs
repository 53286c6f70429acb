//! Entity store
//!
//! Holds the known networks and the selected conversational network.
//! Refreshes are guarded by a monotonic request generation: every
//! refresh start and every local mutation bumps it, and a completion
//! carrying an older generation is discarded. This closes the stale
//! overwrite window where a slow list lands after a delete and
//! resurrects the deleted row.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::backend::MemoryBackend;
use super::lock;
use crate::remote::error::ApiResult;
use crate::remote::types::Network;

#[derive(Default)]
struct EntityState {
    networks: Vec<Network>,
    selected: Option<Network>,
    generation: u64,
    inflight: u32,
}

pub struct EntityStore {
    backend: Arc<dyn MemoryBackend>,
    state: Mutex<EntityState>,
}

impl EntityStore {
    pub fn new(backend: Arc<dyn MemoryBackend>) -> Self {
        Self { backend, state: Mutex::new(EntityState::default()) }
    }

    pub fn networks(&self) -> Vec<Network> {
        lock(&self.state).networks.clone()
    }

    pub fn selected(&self) -> Option<Network> {
        lock(&self.state).selected.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).inflight > 0
    }

    /// Select a network by id; false if unknown
    pub fn select(&self, nid: i64) -> bool {
        let mut state = lock(&self.state);
        match state.networks.iter().find(|n| n.nid == nid).cloned() {
            Some(network) => {
                state.selected = Some(network);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&self) {
        lock(&self.state).selected = None;
    }

    /// Fetch all networks, replacing the local collection. A failed
    /// fetch leaves the prior collection untouched; a completion that
    /// lost the generation race is discarded.
    pub async fn refresh(&self) -> ApiResult<()> {
        let gen = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.inflight += 1;
            state.generation
        };

        let result = self.backend.list_networks().await;

        let mut state = lock(&self.state);
        state.inflight = state.inflight.saturating_sub(1);

        match result {
            Ok(networks) => {
                if state.generation != gen {
                    debug!(gen, current = state.generation, "discarding stale network list");
                    return Ok(());
                }
                state.networks = networks;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch networks");
                Err(err)
            }
        }
    }

    /// Rename a network. Empty or unchanged names are a silent no-op
    /// (returns false, no request). The local copy is updated
    /// optimistically and rolled back if the server rejects the
    /// rename.
    pub async fn rename(&self, nid: i64, new_name: &str) -> ApiResult<bool> {
        let new_name = new_name.trim();

        let previous = {
            let mut state = lock(&self.state);
            let current = match state.networks.iter().find(|n| n.nid == nid) {
                Some(n) => n.name.clone(),
                None => {
                    warn!(nid, "rename target not in local collection");
                    return Ok(false);
                }
            };
            if new_name.is_empty() || new_name == current {
                return Ok(false);
            }

            // Optimistic update, selection included.
            state.generation += 1;
            if let Some(n) = state.networks.iter_mut().find(|n| n.nid == nid) {
                n.name = new_name.to_string();
            }
            if let Some(sel) = state.selected.as_mut() {
                if sel.nid == nid {
                    sel.name = new_name.to_string();
                }
            }
            current
        };

        match self.backend.rename_network(nid, new_name).await {
            Ok(_) => Ok(true),
            Err(err) => {
                warn!(nid, error = %err, "rename rejected; rolling back");
                let mut state = lock(&self.state);
                state.generation += 1;
                if let Some(n) = state.networks.iter_mut().find(|n| n.nid == nid) {
                    n.name = previous.clone();
                }
                if let Some(sel) = state.selected.as_mut() {
                    if sel.nid == nid {
                        sel.name = previous.clone();
                    }
                }
                Err(err)
            }
        }
    }

    /// Delete a network. The row is removed locally only after server
    /// confirmation; if it was selected, the selection is cleared.
    pub async fn delete(&self, nid: i64) -> ApiResult<()> {
        self.backend.delete_network(nid).await?;

        let mut state = lock(&self.state);
        state.generation += 1;
        state.networks.retain(|n| n.nid != nid);
        if state.selected.as_ref().map(|n| n.nid) == Some(nid) {
            state.selected = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::mock::MockBackend;

    fn store_with(names: &[&str]) -> (Arc<MockBackend>, EntityStore) {
        let mock = Arc::new(MockBackend::with_networks(names));
        let store = EntityStore::new(mock.clone());
        (mock, store)
    }

    #[tokio::test]
    async fn test_refresh_populates_networks() {
        let (_, store) = store_with(&["John", "Jane"]);
        store.refresh().await.unwrap();

        let names: Vec<_> = store.networks().into_iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["John", "Jane"]);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_prior_collection() {
        let (mock, store) = store_with(&["John"]);
        store.refresh().await.unwrap();

        mock.fail_transport("list_networks");
        assert!(store.refresh().await.is_err());

        assert_eq!(store.networks().len(), 1);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_select_requires_known_network() {
        let (_, store) = store_with(&["John"]);
        store.refresh().await.unwrap();

        assert!(store.select(1));
        assert_eq!(store.selected().unwrap().name, "John");
        assert!(!store.select(99));
    }

    #[tokio::test]
    async fn test_rename_noop_issues_no_request() {
        let (mock, store) = store_with(&["John"]);
        store.refresh().await.unwrap();
        let calls_before = mock.calls().len();

        assert!(!store.rename(1, "").await.unwrap());
        assert!(!store.rename(1, "   ").await.unwrap());
        assert!(!store.rename(1, "John").await.unwrap());

        assert_eq!(mock.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_rename_updates_selection_too() {
        let (_, store) = store_with(&["John"]);
        store.refresh().await.unwrap();
        store.select(1);

        assert!(store.rename(1, "Johnny").await.unwrap());
        assert_eq!(store.networks()[0].name, "Johnny");
        assert_eq!(store.selected().unwrap().name, "Johnny");
    }

    #[tokio::test]
    async fn test_rename_failure_rolls_back_optimistic_update() {
        let (mock, store) = store_with(&["John"]);
        store.refresh().await.unwrap();
        store.select(1);

        mock.fail_server("rename_network", "nope");
        assert!(store.rename(1, "Johnny").await.is_err());

        assert_eq!(store.networks()[0].name, "John");
        assert_eq!(store.selected().unwrap().name, "John");
    }

    #[tokio::test]
    async fn test_delete_clears_selection_iff_selected() {
        let (_, store) = store_with(&["John", "Jane"]);
        store.refresh().await.unwrap();
        store.select(1);

        // Deleting the unselected network leaves the selection alone.
        store.delete(2).await.unwrap();
        assert_eq!(store.selected().unwrap().nid, 1);

        store.delete(1).await.unwrap();
        assert!(store.selected().is_none());
        assert!(store.networks().is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_row_in_place() {
        let (mock, store) = store_with(&["John"]);
        store.refresh().await.unwrap();

        mock.fail_transport("delete_network");
        assert!(store.delete(1).await.is_err());
        assert_eq!(store.networks().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_list_cannot_resurrect_deleted_row() {
        let (mock, store) = store_with(&["John", "Jane"]);
        store.refresh().await.unwrap();

        // The slow refresh snapshots both rows, then stalls until the
        // gate fires; meanwhile the delete completes and bumps the
        // generation, so the stale snapshot must be discarded.
        let gate = mock.gate_next_list();
        let slow_refresh = store.refresh();
        let delete_then_release = async {
            store.delete(1).await.unwrap();
            let _ = gate.send(());
        };

        let (refresh_result, _) = tokio::join!(slow_refresh, delete_then_release);
        refresh_result.unwrap();

        let nids: Vec<_> = store.networks().into_iter().map(|n| n.nid).collect();
        assert_eq!(nids, vec![2], "deleted network must not reappear");
    }
}
