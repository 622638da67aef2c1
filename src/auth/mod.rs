//! auth - backend session authentication
//!
//! # Architecture
//!
//! The auth system:
//! - Exchanges an identity-provider token for a backend bearer token
//! - Stores the session (token, user id, profile) in a [`TokenStore`]
//! - Refreshes the bearer token through an HTTP-only refresh cookie
//! - Runs at most one refresh at a time; other 401s queue behind it
//! - Never exposes tokens in logs, errors, or outputs
//!
//! # Components
//!
//! - [`Session`] - Persisted session state
//! - [`TokenStore`] - Async persistence seam; [`SecretTokenStore`] over secrets
//! - [`AuthClient`] - Login, refresh, revoke, register
//! - [`RefreshCoordinator`] - Single-flight refresh and pending queue
//! - [`SessionController`] - Authenticated flag for UI shells
//!
//! # Security
//!
//! Tokens MUST never appear in:
//! - logs (including --debug)
//! - JSON outputs
//! - error messages
//! - debug output
//!
//! Types holding tokens implement `Debug` by hand to redact them.
//!
//! # Example
//!
//! ```ignore
//! use partnerlink::auth::{AuthClient, SecretTokenStore, SessionController};
//! use std::sync::Arc;
//!
//! let secrets = partnerlink::secrets::create_store("file")?;
//! let store = Arc::new(SecretTokenStore::new(secrets));
//! let auth = Arc::new(AuthClient::new(http, base_url, store.clone()));
//! let controller = Arc::new(SessionController::new(store));
//! auth.add_listener(controller.clone());
//!
//! controller.startup().await;
//! auth.login(&id_token).await?;
//! assert!(controller.is_authenticated());
//! ```

mod client;
mod errors;
mod refresh;
mod session;
mod session_controller;
mod token_store;

pub use client::AuthClient;
pub(crate) use client::error_message;
pub use errors::AuthError;
pub use refresh::{
    RefreshCoordinator, RefreshLease, RefreshTurn, RefreshWaiter, DEFAULT_REFRESH_TIMEOUT,
};
pub use session::{Session, BEARER_TOKEN_KEY, SESSION_KEYS, USER_ID_KEY, USER_INFO_KEY};
pub use session_controller::{SessionController, SessionListener};
pub use token_store::{SecretTokenStore, TokenStore};
