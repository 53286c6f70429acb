//! Session
//!
//! Context-passed aggregate owning the stores, the conversation
//! engine, the overlay coordinator, the single inline-edit slot, and
//! the notice queue. Views receive a `&Session` instead of reaching
//! for globals, so tests can run isolated sessions against a mock
//! backend.

use std::sync::{Arc, Mutex};

use super::backend::MemoryBackend;
use super::classifier::{Action, ActionClassifier, ClassifierMode};
use super::conversation::ConversationEngine;
use super::edit::{CommitTrigger, EditTarget, InlineEdit};
use super::entity::EntityStore;
use super::facts::FactStore;
use super::lock;
use super::notice::NoticeQueue;
use super::overlay::OverlayCoordinator;

pub struct Session {
    pub entities: EntityStore,
    pub facts: FactStore,
    pub classifier: ActionClassifier,
    pub engine: ConversationEngine,
    pub overlays: OverlayCoordinator,
    pub notices: NoticeQueue,
    edit: Mutex<Option<InlineEdit>>,
}

impl Session {
    pub fn new(backend: Arc<dyn MemoryBackend>, mode: ClassifierMode) -> Self {
        Self {
            entities: EntityStore::new(backend.clone()),
            facts: FactStore::new(backend.clone()),
            classifier: ActionClassifier::new(mode),
            engine: ConversationEngine::new(backend),
            overlays: OverlayCoordinator::new(),
            notices: NoticeQueue::new(),
            edit: Mutex::new(None),
        }
    }

    /// Initial load: fetch the networks once, surfacing a failure as a
    /// notice while keeping the session usable.
    pub async fn start(&self) {
        if let Err(err) = self.entities.refresh().await {
            self.notices.error(err.alert("fetching networks"));
        }
    }

    /// Submit one conversational input
    pub async fn submit(&self, input: &str) -> Option<Action> {
        self.engine
            .submit(input, &self.classifier, &self.entities, &self.facts, &self.notices)
            .await
    }

    // ============== Selection ==============

    pub fn select_network(&self, nid: i64) -> bool {
        let selected = self.entities.select(nid);
        self.classifier.sync_selection(self.entities.selected().is_some());
        selected
    }

    pub fn clear_network_selection(&self) {
        self.entities.clear_selection();
        self.classifier.sync_selection(false);
    }

    /// Set the explicit action; Ask is refused with no selection
    pub fn set_action(&self, action: Action) -> bool {
        self.classifier.set_action(action, self.entities.selected().is_some())
    }

    // ============== Network mutation ==============

    pub async fn delete_network(&self, nid: i64) -> bool {
        match self.entities.delete(nid).await {
            Ok(()) => {
                self.classifier.sync_selection(self.entities.selected().is_some());
                true
            }
            Err(err) => {
                self.notices.error(err.alert("deleting network"));
                false
            }
        }
    }

    pub async fn delete_viewed_content(&self, cid: i64) -> bool {
        match self.facts.delete_viewed(cid).await {
            Ok(deleted) => deleted,
            Err(err) => {
                self.notices.error(err.alert("deleting content"));
                false
            }
        }
    }

    // ============== Overlays ==============

    pub fn open_network_overlay(&self, anchor: impl Into<String>) {
        self.overlays.open_networks(anchor);
    }

    pub fn close_network_overlay(&self) {
        self.overlays.close_networks();
    }

    /// Open the content overlay for one network. The picker opens even
    /// when the fetch fails; the failure becomes a notice and the list
    /// shows empty.
    pub async fn open_content_overlay(&self, anchor: impl Into<String>, nid: i64) {
        let fetched = self.facts.view(nid).await;
        self.overlays.open_contents(anchor);
        if let Err(err) = fetched {
            self.notices.error(err.alert("fetching network contents"));
        }
    }

    /// Closing the content overlay clears the viewed network so a
    /// stale delete cannot target the wrong entity.
    pub fn close_content_overlay(&self) {
        self.overlays.close_contents();
        self.facts.clear_view();
    }

    // ============== Inline editing ==============

    /// Begin editing a field; any previous edit is discarded (single
    /// slot invariant).
    pub fn begin_edit(&self, target: EditTarget, original: impl Into<String>) {
        *lock(&self.edit) = Some(InlineEdit::new(target, original));
    }

    pub fn edit_in_progress(&self) -> Option<InlineEdit> {
        lock(&self.edit).clone()
    }

    pub fn set_edit_buffer(&self, text: impl Into<String>) {
        if let Some(edit) = lock(&self.edit).as_mut() {
            edit.buffer = text.into();
        }
    }

    /// Escape: discard the buffer without committing
    pub fn cancel_edit(&self) {
        *lock(&self.edit) = None;
    }

    /// Commit the in-progress edit. Empty/unchanged buffers are a
    /// silent no-op; a failed content update reinstates the edit with
    /// the pre-edit text. Returns whether a change was persisted.
    pub async fn commit_edit(&self, trigger: CommitTrigger) -> bool {
        if !trigger.commits() {
            return false;
        }

        let edit = match lock(&self.edit).take() {
            Some(edit) => edit,
            None => return false,
        };
        if edit.is_noop() {
            return false;
        }

        match edit.target {
            EditTarget::NetworkName { nid } => match self.entities.rename(nid, &edit.buffer).await
            {
                Ok(renamed) => renamed,
                Err(err) => {
                    // Store already rolled the optimistic name back.
                    self.notices.error(err.alert("updating name"));
                    false
                }
            },
            EditTarget::ContentText { nid, cid } => {
                match self.facts.update(nid, cid, &edit.buffer).await {
                    Ok(updated) => updated,
                    Err(err) => {
                        self.notices.error(err.alert("updating content"));
                        let mut failed = edit;
                        failed.revert();
                        *lock(&self.edit) = Some(failed);
                        false
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::mock::MockBackend;

    fn session_with(names: &[&str]) -> (Arc<MockBackend>, Session) {
        let mock = Arc::new(MockBackend::with_networks(names));
        let session = Session::new(mock.clone(), ClassifierMode::Explicit);
        (mock, session)
    }

    #[tokio::test]
    async fn test_start_failure_leaves_session_usable() {
        let (mock, session) = session_with(&["John"]);
        mock.fail_transport("list_networks");

        session.start().await;
        assert!(session.notices.drain()[0].is_error());
        assert!(session.entities.networks().is_empty());
    }

    #[tokio::test]
    async fn test_save_with_no_selection_creates_network_and_fact_is_viewable() {
        // Scenario: submit "John likes coffee" with nothing selected;
        // the refetched list gains the new network, and its overlay
        // shows the saved fact.
        let mock = Arc::new(MockBackend::new());
        let session = Session::new(mock.clone(), ClassifierMode::Explicit);
        session.start().await;
        assert!(session.entities.networks().is_empty());

        session.submit("John likes coffee").await;

        let networks = session.entities.networks();
        assert_eq!(networks.len(), 1);
        assert_eq!(networks[0].name, "John");

        assert!(session.select_network(networks[0].nid));
        session.open_content_overlay("row-0", networks[0].nid).await;

        let contents = session.facts.contents();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].content, "John likes coffee");
        assert!(!contents[0].created_at.is_empty());
    }

    #[tokio::test]
    async fn test_ask_with_selection_appends_answer() {
        let (mock, session) = session_with(&["John"]);
        session.start().await;
        session.select_network(1);
        assert!(session.set_action(Action::Ask));
        mock.set_answer("He likes coffee.");

        session.submit("what does John like?").await;

        let transcript = session.engine.transcript();
        assert_eq!(transcript.last().unwrap().content, "He likes coffee.");
        assert!(mock.calls().iter().any(|c| c.starts_with("query(1,")));
    }

    #[tokio::test]
    async fn test_delete_selected_network_resets_action_to_save() {
        let (_, session) = session_with(&["John"]);
        session.start().await;
        session.select_network(1);
        session.set_action(Action::Ask);

        assert!(session.delete_network(1).await);
        assert!(session.entities.selected().is_none());
        assert_eq!(session.classifier.current(), Action::Save);
    }

    #[tokio::test]
    async fn test_overlay_open_survives_fetch_failure() {
        let (mock, session) = session_with(&["John"]);
        session.start().await;
        mock.fail_transport("list_contents");

        session.open_content_overlay("row-0", 1).await;

        assert!(session.overlays.contents_open());
        assert_eq!(session.facts.viewed_network(), Some(1));
        assert!(session.facts.contents().is_empty());
        assert!(session.notices.drain()[0].is_error());
    }

    #[tokio::test]
    async fn test_closing_content_overlay_clears_viewed_network() {
        let (_, session) = session_with(&["John"]);
        session.start().await;
        session.open_content_overlay("row-0", 1).await;

        session.close_content_overlay();
        assert!(!session.overlays.contents_open());
        assert_eq!(session.facts.viewed_network(), None);

        // With the view cleared, a content delete fails fast.
        assert!(!session.delete_viewed_content(1).await);
    }

    #[tokio::test]
    async fn test_commit_empty_edit_is_silent_noop() {
        let (mock, session) = session_with(&["John"]);
        session.start().await;
        mock.add_content(1, "likes coffee");
        session.open_content_overlay("row-0", 1).await;

        session.begin_edit(EditTarget::ContentText { nid: 1, cid: 1 }, "likes coffee");
        session.set_edit_buffer("");
        let calls_before = mock.calls().len();

        assert!(!session.commit_edit(CommitTrigger::Enter { shift: false }).await);
        assert_eq!(mock.calls().len(), calls_before, "no update request issued");
        assert_eq!(session.facts.contents()[0].content, "likes coffee");
        assert!(session.notices.is_empty());
    }

    #[tokio::test]
    async fn test_shift_enter_does_not_commit() {
        let (_, session) = session_with(&["John"]);
        session.begin_edit(EditTarget::NetworkName { nid: 1 }, "John");
        session.set_edit_buffer("Johnny");

        assert!(!session.commit_edit(CommitTrigger::Enter { shift: true }).await);
        assert!(session.edit_in_progress().is_some(), "edit stays active");
    }

    #[tokio::test]
    async fn test_escape_discards_edit_buffer() {
        let (mock, session) = session_with(&["John"]);
        session.start().await;
        session.begin_edit(EditTarget::NetworkName { nid: 1 }, "John");
        session.set_edit_buffer("Johnny");

        session.cancel_edit();
        assert!(session.edit_in_progress().is_none());
        assert!(!mock.calls().iter().any(|c| c.starts_with("rename_network")));
        assert_eq!(session.entities.networks()[0].name, "John");
    }

    #[tokio::test]
    async fn test_rename_commit_via_blur() {
        let (_, session) = session_with(&["John"]);
        session.start().await;
        session.begin_edit(EditTarget::NetworkName { nid: 1 }, "John");
        session.set_edit_buffer("Johnny");

        assert!(session.commit_edit(CommitTrigger::Blur).await);
        assert_eq!(session.entities.networks()[0].name, "Johnny");
        assert!(session.edit_in_progress().is_none());
    }

    #[tokio::test]
    async fn test_failed_content_update_reinstates_pre_edit_buffer() {
        let (mock, session) = session_with(&["John"]);
        session.start().await;
        mock.add_content(1, "likes coffee");
        session.open_content_overlay("row-0", 1).await;
        mock.fail_server("update_content", "nope");

        session.begin_edit(EditTarget::ContentText { nid: 1, cid: 1 }, "likes coffee");
        session.set_edit_buffer("likes tea");

        assert!(!session.commit_edit(CommitTrigger::Confirm).await);

        let edit = session.edit_in_progress().expect("edit reinstated");
        assert_eq!(edit.buffer, "likes coffee", "buffer reverted to pre-edit text");
        assert_eq!(session.facts.contents()[0].content, "likes coffee");
        assert!(session.notices.drain()[0].is_error());
    }

    #[tokio::test]
    async fn test_begin_edit_replaces_previous_slot() {
        let (_, session) = session_with(&["John", "Jane"]);
        session.begin_edit(EditTarget::NetworkName { nid: 1 }, "John");
        session.begin_edit(EditTarget::NetworkName { nid: 2 }, "Jane");

        let edit = session.edit_in_progress().unwrap();
        assert_eq!(edit.target, EditTarget::NetworkName { nid: 2 });
    }

    #[tokio::test]
    async fn test_closing_overlays_preserves_selection() {
        let (_, session) = session_with(&["John"]);
        session.start().await;
        session.select_network(1);
        session.open_network_overlay("toolbar");
        session.open_content_overlay("row-0", 1).await;

        session.close_network_overlay();
        session.close_content_overlay();

        assert_eq!(session.entities.selected().unwrap().nid, 1);
    }

    #[tokio::test]
    async fn test_viewing_does_not_change_selection() {
        let (_, session) = session_with(&["John", "Jane"]);
        session.start().await;
        session.select_network(1);

        session.open_content_overlay("row-1", 2).await;

        assert_eq!(session.entities.selected().unwrap().nid, 1);
        assert_eq!(session.facts.viewed_network(), Some(2));
    }
}
