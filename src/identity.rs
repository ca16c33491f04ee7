//! Local sign-in
//!
//! There is no credential check: signing in or up records an identity in the
//! store under [`SESSION_KEY`] so the next launch starts signed in.

use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Store key holding the signed-in user
pub const SESSION_KEY: &str = "session-user";

/// Name given to users who sign in without signing up first
pub const DEFAULT_LOGIN_NAME: &str = "John Doe";

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please enter your name")]
    MissingName,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a password")]
    MissingPassword,
}

/// Source of the current identity
pub trait IdentityProvider {
    fn current(&self) -> Option<&Identity>;

    fn login(&mut self, email: &str, password: &str) -> Result<Identity, AuthError>;

    fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<Identity, AuthError>;

    fn logout(&mut self);
}

/// Identity provider that keeps the session in the local store
pub struct LocalIdentityProvider {
    store: Arc<dyn KeyValueStore>,
    current: Option<Identity>,
    login_name: String,
}

impl LocalIdentityProvider {
    /// Restore the previous session, if any.
    ///
    /// An unreadable or malformed session entry starts signed out.
    pub fn restore(store: Arc<dyn KeyValueStore>, login_name: impl Into<String>) -> Self {
        let current = match store.get(SESSION_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Identity>(&raw)
                .map_err(|err| tracing::warn!("Ignoring malformed session: {err}"))
                .ok(),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!("Failed to read session: {err}");
                None
            }
        };
        if let Some(identity) = &current {
            tracing::info!("Restored session for {}", identity.email);
        }
        Self {
            store,
            current,
            login_name: login_name.into(),
        }
    }

    fn sign_in(&mut self, identity: Identity) -> Identity {
        match serde_json::to_string(&identity) {
            Ok(raw) => {
                if let Err(err) = self.store.set(SESSION_KEY, &raw) {
                    tracing::warn!("Failed to save session: {err}");
                }
            }
            Err(err) => tracing::warn!("Failed to encode session: {err}"),
        }
        tracing::info!("Signed in as {}", identity.email);
        self.current = Some(identity.clone());
        identity
    }
}

fn checked_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(AuthError::InvalidEmail),
    }
}

fn checked_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        Err(AuthError::MissingPassword)
    } else {
        Ok(())
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    fn login(&mut self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = checked_email(email)?;
        checked_password(password)?;
        let name = self.login_name.clone();
        Ok(self.sign_in(Identity::new(name, email)))
    }

    fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<Identity, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        let email = checked_email(email)?;
        checked_password(password)?;
        Ok(self.sign_in(Identity::new(name, email)))
    }

    fn logout(&mut self) {
        if let Some(identity) = self.current.take() {
            tracing::info!("Signed out {}", identity.email);
        }
        if let Err(err) = self.store.delete(SESSION_KEY) {
            tracing::warn!("Failed to clear session: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, MockKeyValueStore, StoreError};

    fn provider() -> (Arc<MemoryStore>, LocalIdentityProvider) {
        let store = Arc::new(MemoryStore::new());
        let provider = LocalIdentityProvider::restore(store.clone(), DEFAULT_LOGIN_NAME);
        (store, provider)
    }

    #[test]
    fn test_starts_signed_out() {
        let (_, provider) = provider();
        assert!(provider.current().is_none());
    }

    #[test]
    fn test_login_fabricates_name() {
        let (store, mut provider) = provider();
        let identity = provider.login(" ravi@example.com ", "secret").unwrap();
        assert_eq!(identity, Identity::new("John Doe", "ravi@example.com"));
        assert_eq!(provider.current(), Some(&identity));

        let raw = store.get(SESSION_KEY).unwrap().unwrap();
        let stored: Identity = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, identity);
    }

    #[test]
    fn test_signup_uses_entered_name() {
        let (_, mut provider) = provider();
        let identity = provider.signup("Asha", "asha@example.com", "pw").unwrap();
        assert_eq!(identity.name, "Asha");
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let (_, mut provider) = provider();
        assert_eq!(provider.login("nope", "pw"), Err(AuthError::InvalidEmail));
        assert_eq!(provider.login("a@b.co", ""), Err(AuthError::MissingPassword));
        assert_eq!(
            provider.signup("  ", "a@b.co", "pw"),
            Err(AuthError::MissingName)
        );
        assert!(provider.current().is_none());
    }

    #[test]
    fn test_session_is_restored() {
        let (store, mut provider) = provider();
        provider.signup("Asha", "asha@example.com", "pw").unwrap();

        let restored = LocalIdentityProvider::restore(store, DEFAULT_LOGIN_NAME);
        assert_eq!(
            restored.current(),
            Some(&Identity::new("Asha", "asha@example.com"))
        );
    }

    #[test]
    fn test_logout_clears_session() {
        let (store, mut provider) = provider();
        provider.login("a@b.co", "pw").unwrap();
        provider.logout();
        assert!(provider.current().is_none());
        assert!(store.get(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn test_malformed_session_starts_signed_out() {
        let store = Arc::new(MemoryStore::new());
        store.set(SESSION_KEY, "{\"name\": 3}").unwrap();
        let provider = LocalIdentityProvider::restore(store, DEFAULT_LOGIN_NAME);
        assert!(provider.current().is_none());
    }

    #[test]
    fn test_store_failure_still_signs_in() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get().returning(|_| Ok(None));
        mock.expect_set()
            .returning(|_, _| Err(StoreError::Poisoned));
        let mut provider = LocalIdentityProvider::restore(Arc::new(mock), "Guest");
        let identity = provider.login("a@b.co", "pw").unwrap();
        assert_eq!(identity.name, "Guest");
        assert!(provider.current().is_some());
    }
}
