//! auth::session_controller
//!
//! Holds the authoritative "is the user signed in" flag.
//!
//! # Architecture
//!
//! The flag is a `tokio::sync::watch` channel. It is derived from the token
//! store only: at startup, and each time the [`AuthClient`](super::AuthClient)
//! reports that the session changed (login, logout, forced logout after a
//! failed refresh). Consumers read [`is_authenticated`] or subscribe for
//! transitions.
//!
//! [`is_authenticated`]: SessionController::is_authenticated

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::token_store::TokenStore;

/// Notified after the stored session changes.
#[async_trait]
pub trait SessionListener: Send + Sync {
    /// Called once the store reflects the new state.
    async fn session_changed(&self);
}

/// Tracks whether a bearer token is stored.
pub struct SessionController {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<bool>,
}

impl SessionController {
    /// Create a controller. Starts unauthenticated until [`startup`](Self::startup).
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(false);
        Self { store, state }
    }

    /// Derive the initial state from the store.
    pub async fn startup(&self) -> bool {
        self.sync().await
    }

    /// Re-read the store and publish the result.
    ///
    /// A store read failure is treated as signed out.
    pub async fn sync(&self) -> bool {
        let authenticated = match self.store.get().await {
            Ok(session) => session.is_authenticated(),
            Err(e) => {
                warn!(error = %e, "could not read session, treating as signed out");
                false
            }
        };

        self.state.send_if_modified(|current| {
            if *current == authenticated {
                false
            } else {
                debug!(authenticated, "session state changed");
                *current = authenticated;
                true
            }
        });
        authenticated
    }

    /// Current state.
    pub fn is_authenticated(&self) -> bool {
        *self.state.borrow()
    }

    /// Receive every state transition.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}

#[async_trait]
impl SessionListener for SessionController {
    async fn session_changed(&self) {
        self.sync().await;
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
