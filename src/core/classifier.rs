//! Action classifier
//!
//! Decides whether a raw submission is a fact to persist or a question
//! to answer. Two variants exist: an explicit user-set mode and a
//! server-inferred classification. A session picks exactly one at
//! construction; there is no runtime hybrid. The classifier never
//! touches the transcript.

use std::sync::Mutex;

use tracing::warn;

use super::backend::MemoryBackend;
use super::lock;
use crate::remote::types::ActionType;

/// What a submission turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Save,
    Ask,
}

/// Which classification variant the session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierMode {
    /// User picks save/ask from a control; Ask requires a selection
    #[default]
    Explicit,
    /// Every submission is classified by the server
    Inferred,
}

impl std::str::FromStr for ClassifierMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "explicit" => Ok(ClassifierMode::Explicit),
            "inferred" => Ok(ClassifierMode::Inferred),
            _ => anyhow::bail!("Unknown classifier mode: {} (use explicit or inferred)", s),
        }
    }
}

pub struct ActionClassifier {
    mode: ClassifierMode,
    explicit: Mutex<Action>,
}

impl ActionClassifier {
    pub fn new(mode: ClassifierMode) -> Self {
        Self { mode, explicit: Mutex::new(Action::Save) }
    }

    pub fn mode(&self) -> ClassifierMode {
        self.mode
    }

    /// Current explicit action (meaningful in explicit mode)
    pub fn current(&self) -> Action {
        *lock(&self.explicit)
    }

    /// Set the explicit action. Ask is only offered while a network is
    /// selected; returns whether the change was accepted.
    pub fn set_action(&self, action: Action, has_selection: bool) -> bool {
        if action == Action::Ask && !has_selection {
            return false;
        }
        *lock(&self.explicit) = action;
        true
    }

    /// Mirror a selection change: with nothing selected the only valid
    /// explicit action is Save.
    pub fn sync_selection(&self, has_selection: bool) {
        if !has_selection {
            *lock(&self.explicit) = Action::Save;
        }
    }

    /// Resolve the action for one submission. Inferred mode treats the
    /// server's decision as authoritative and fails open to Ask, the
    /// non-destructive path.
    pub async fn resolve(&self, backend: &dyn MemoryBackend, text: &str) -> Action {
        match self.mode {
            ClassifierMode::Explicit => self.current(),
            ClassifierMode::Inferred => match backend.determine_action(text).await {
                Ok(resp) => match resp.action_type {
                    ActionType::Save => Action::Save,
                    ActionType::Send => Action::Ask,
                },
                Err(err) => {
                    warn!(error = %err, "classification failed; defaulting to ask");
                    Action::Ask
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::mock::MockBackend;

    #[test]
    fn test_explicit_defaults_to_save() {
        let classifier = ActionClassifier::new(ClassifierMode::Explicit);
        assert_eq!(classifier.current(), Action::Save);
    }

    #[test]
    fn test_ask_requires_selection() {
        let classifier = ActionClassifier::new(ClassifierMode::Explicit);

        assert!(!classifier.set_action(Action::Ask, false));
        assert_eq!(classifier.current(), Action::Save);

        assert!(classifier.set_action(Action::Ask, true));
        assert_eq!(classifier.current(), Action::Ask);
    }

    #[test]
    fn test_clearing_selection_forces_save() {
        let classifier = ActionClassifier::new(ClassifierMode::Explicit);
        classifier.set_action(Action::Ask, true);

        classifier.sync_selection(false);
        assert_eq!(classifier.current(), Action::Save);

        // A still-present selection leaves the mode alone.
        classifier.set_action(Action::Ask, true);
        classifier.sync_selection(true);
        assert_eq!(classifier.current(), Action::Ask);
    }

    #[tokio::test]
    async fn test_inferred_maps_server_decision() {
        let mock = MockBackend::new();
        let classifier = ActionClassifier::new(ClassifierMode::Inferred);

        mock.set_action(crate::remote::types::ActionType::Save);
        assert_eq!(classifier.resolve(&mock, "John likes coffee").await, Action::Save);

        mock.set_action(crate::remote::types::ActionType::Send);
        assert_eq!(classifier.resolve(&mock, "what does John like?").await, Action::Ask);
    }

    #[tokio::test]
    async fn test_inferred_fails_open_to_ask() {
        let mock = MockBackend::new();
        mock.set_action(crate::remote::types::ActionType::Save);
        mock.fail_transport("determine_action");

        let classifier = ActionClassifier::new(ClassifierMode::Inferred);
        assert_eq!(classifier.resolve(&mock, "secret thought").await, Action::Ask);
    }

    #[tokio::test]
    async fn test_explicit_mode_never_calls_server() {
        let mock = MockBackend::new();
        let classifier = ActionClassifier::new(ClassifierMode::Explicit);

        classifier.resolve(&mock, "anything").await;
        assert!(mock.calls().is_empty());
    }
}
