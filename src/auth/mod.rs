//! Authentication collaborator
//!
//! The core only consumes auth: it routes to the chat view when a user
//! is present and attaches a fresh token to each outgoing request. The
//! provider's internal token mechanics are out of scope; `StoredAuth`
//! is a token-based provider backed by the config file, for users who
//! obtained an ID token from the Hae app.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::AuthConfig;
use crate::core::lock;

/// Signed-in user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
    pub display_name: String,
    pub uid: String,
}

/// Auth provider surface the core consumes
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign in with credentials, yielding the user profile
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Register a new account
    async fn register(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Sign out the current user
    async fn sign_out(&self) -> Result<()>;

    /// Currently signed-in user, if any
    fn current_user(&self) -> Option<AuthUser>;

    /// Fresh bearer token for an outgoing request
    async fn id_token(&self) -> Option<String>;

    /// Auth-state change subscription; yields the nullable user on
    /// every sign-in/sign-out
    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>>;
}

struct Credentials {
    user: AuthUser,
    token: String,
}

/// Config-backed provider holding a stored ID token
pub struct StoredAuth {
    state: std::sync::Mutex<Option<Credentials>>,
    tx: watch::Sender<Option<AuthUser>>,
}

impl StoredAuth {
    pub fn from_config(auth: &AuthConfig) -> Self {
        let creds = auth.token.as_ref().map(|token| Credentials {
            user: AuthUser {
                email: auth.email.clone().unwrap_or_default(),
                display_name: auth.display_name.clone().unwrap_or_default(),
                uid: auth.uid.clone().unwrap_or_default(),
            },
            token: token.clone(),
        });
        let initial = creds.as_ref().map(|c| c.user.clone());
        let (tx, _) = watch::channel(initial);

        Self { state: std::sync::Mutex::new(creds), tx }
    }
}

#[async_trait]
impl AuthProvider for StoredAuth {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthUser> {
        let state = lock(&self.state);
        match state.as_ref() {
            Some(creds) if creds.user.email == email => {
                let user = creds.user.clone();
                let _ = self.tx.send(Some(user.clone()));
                Ok(user)
            }
            _ => anyhow::bail!(
                "No stored token for {}. Obtain an ID token from the Hae app and run `hae login`.",
                email
            ),
        }
    }

    async fn register(&self, _email: &str, _password: &str) -> Result<AuthUser> {
        anyhow::bail!("Registration happens in the Hae app; afterwards run `hae login`.")
    }

    async fn sign_out(&self) -> Result<()> {
        *lock(&self.state) = None;
        let _ = self.tx.send(None);
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        lock(&self.state).as_ref().map(|c| c.user.clone())
    }

    async fn id_token(&self) -> Option<String> {
        lock(&self.state).as_ref().map(|c| c.token.clone())
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_token() -> AuthConfig {
        AuthConfig {
            token: Some("tok-123".to_string()),
            email: Some("a@b.c".to_string()),
            display_name: Some("A".to_string()),
            uid: Some("uid-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_stored_auth_exposes_user_and_token() {
        let auth = StoredAuth::from_config(&config_with_token());
        assert_eq!(auth.current_user().unwrap().email, "a@b.c");
        assert_eq!(auth.id_token().await.unwrap(), "tok-123");
    }

    #[tokio::test]
    async fn test_sign_out_clears_state_and_notifies() {
        let auth = StoredAuth::from_config(&config_with_token());
        let rx = auth.subscribe();
        assert!(rx.borrow().is_some());

        auth.sign_out().await.unwrap();
        assert!(auth.current_user().is_none());
        assert!(auth.id_token().await.is_none());
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_requires_matching_stored_token() {
        let auth = StoredAuth::from_config(&config_with_token());
        assert!(auth.sign_in("a@b.c", "pw").await.is_ok());
        assert!(auth.sign_in("other@b.c", "pw").await.is_err());

        let empty = StoredAuth::from_config(&AuthConfig::default());
        assert!(empty.current_user().is_none());
        assert!(empty.sign_in("a@b.c", "pw").await.is_err());
    }
}
