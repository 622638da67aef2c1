//! auth::session
//!
//! The persisted session: bearer token plus minimal identity.
//!
//! # Storage
//!
//! Each field is its own secret entry so that clearing the session removes
//! every piece independently of the others:
//!
//! | field          | key                    | encoding        |
//! |----------------|------------------------|-----------------|
//! | `bearer_token` | `session.bearer_token` | raw string      |
//! | `user_id`      | `session.user_id`      | decimal integer |
//! | `user_info`    | `session.user_info`    | JSON text       |
//!
//! # Security
//!
//! `Debug` redacts the bearer token.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::AuthError;

/// Secret key for the bearer token.
pub const BEARER_TOKEN_KEY: &str = "session.bearer_token";

/// Secret key for the backend user id.
pub const USER_ID_KEY: &str = "session.user_id";

/// Secret key for the JSON-encoded profile.
pub const USER_INFO_KEY: &str = "session.user_info";

/// Every key the session owns, in write order.
pub const SESSION_KEYS: [&str; 3] = [BEARER_TOKEN_KEY, USER_ID_KEY, USER_INFO_KEY];

/// Authenticated session state.
///
/// All fields absent means signed out.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Short-lived credential sent as `Authorization: Bearer ...`.
    pub bearer_token: Option<String>,

    /// Backend user id returned at login.
    pub user_id: Option<u64>,

    /// Arbitrary profile record returned at login.
    pub user_info: Option<serde_json::Value>,
}

impl Session {
    /// A signed-out session.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when a bearer token is present.
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// True when every field is absent.
    pub fn is_empty(&self) -> bool {
        self.bearer_token.is_none() && self.user_id.is_none() && self.user_info.is_none()
    }

    /// Copy of this session carrying a new bearer token.
    pub fn with_bearer_token(&self, token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
            ..self.clone()
        }
    }

    /// Rebuild a session from raw stored values.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidSession`] when `user_id` is not an integer or
    /// `user_info` is not JSON.
    pub fn from_stored(
        bearer_token: Option<String>,
        user_id: Option<String>,
        user_info: Option<String>,
    ) -> Result<Self, AuthError> {
        let user_id = user_id
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| AuthError::InvalidSession(format!("user id: {}", e)))
            })
            .transpose()?;

        let user_info = user_info
            .map(|raw| {
                serde_json::from_str(&raw)
                    .map_err(|e| AuthError::InvalidSession(format!("user info: {}", e)))
            })
            .transpose()?;

        Ok(Self {
            bearer_token: bearer_token.filter(|t| !t.is_empty()),
            user_id,
            user_info,
        })
    }

    /// Encode the stored representation of `user_id` and `user_info`.
    pub(crate) fn encoded_identity(&self) -> Result<(Option<String>, Option<String>), AuthError> {
        let user_info = self
            .user_info
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AuthError::InvalidSession(format!("user info: {}", e)))?;
        Ok((self.user_id.map(|id| id.to_string()), user_info))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("user_id", &self.user_id)
            .field("user_info", &self.user_info)
            .finish()
    }
}
