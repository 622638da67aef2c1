//! auth::token_store
//!
//! Durable persistence for the [`Session`].
//!
//! # Architecture
//!
//! [`TokenStore`] is the async seam the rest of the crate depends on.
//! [`SecretTokenStore`] implements it over any synchronous
//! [`SecretStore`], moving each blocking call onto tokio's blocking pool.
//!
//! # Invariants
//!
//! - `set` writes present fields and deletes absent ones, so a new token is
//!   never paired with a stale identity
//! - `clear` removes every session key; a following `get` returns an empty
//!   session, and clearing twice is the same as clearing once
//! - `set_bearer_token` touches only the token entry

use std::sync::Arc;

use async_trait::async_trait;

use super::errors::AuthError;
use super::session::{Session, BEARER_TOKEN_KEY, SESSION_KEYS, USER_ID_KEY, USER_INFO_KEY};
use crate::secrets::SecretStore;

/// Async session persistence.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the current session. Missing entries are reported as absent.
    async fn get(&self) -> Result<Session, AuthError>;

    /// Replace the whole session.
    async fn set(&self, session: &Session) -> Result<(), AuthError>;

    /// Overwrite only the bearer token (refresh path).
    async fn set_bearer_token(&self, token: &str) -> Result<(), AuthError>;

    /// Remove token, user id, and profile.
    async fn clear(&self) -> Result<(), AuthError>;
}

/// [`TokenStore`] backed by a [`SecretStore`].
#[derive(Clone)]
pub struct SecretTokenStore {
    secrets: Arc<dyn SecretStore>,
}

impl SecretTokenStore {
    /// Wrap a secret store.
    pub fn new(secrets: Arc<dyn SecretStore>) -> Self {
        Self { secrets }
    }

    /// Run a closure against the secret store on the blocking pool.
    async fn blocking<T, F>(&self, f: F) -> Result<T, AuthError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn SecretStore) -> Result<T, AuthError> + Send + 'static,
    {
        let secrets = Arc::clone(&self.secrets);
        tokio::task::spawn_blocking(move || f(secrets.as_ref())).await?
    }
}

#[async_trait]
impl TokenStore for SecretTokenStore {
    async fn get(&self) -> Result<Session, AuthError> {
        self.blocking(|secrets| {
            let token = secrets.get(BEARER_TOKEN_KEY)?;
            let user_id = secrets.get(USER_ID_KEY)?;
            let user_info = secrets.get(USER_INFO_KEY)?;
            Session::from_stored(token, user_id, user_info)
        })
        .await
    }

    async fn set(&self, session: &Session) -> Result<(), AuthError> {
        let (user_id, user_info) = session.encoded_identity()?;
        let token = session.bearer_token.clone();

        self.blocking(move |secrets| {
            let entries = [
                (BEARER_TOKEN_KEY, token),
                (USER_ID_KEY, user_id),
                (USER_INFO_KEY, user_info),
            ];
            for (key, value) in entries {
                match value {
                    Some(v) => secrets.set(key, &v)?,
                    None => secrets.delete(key)?,
                }
            }
            Ok(())
        })
        .await
    }

    async fn set_bearer_token(&self, token: &str) -> Result<(), AuthError> {
        let token = token.to_string();
        self.blocking(move |secrets| Ok(secrets.set(BEARER_TOKEN_KEY, &token)?))
            .await
    }

    async fn clear(&self) -> Result<(), AuthError> {
        self.blocking(|secrets| Ok(secrets.delete_all(&SESSION_KEYS)?))
            .await
    }
}

impl std::fmt::Debug for SecretTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretTokenStore").finish_non_exhaustive()
    }
}
