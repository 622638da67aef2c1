//! auth::errors
//!
//! Authentication error types.
//!
//! # Design
//!
//! Error messages MUST NOT contain tokens. Payloads are descriptions of what
//! went wrong, never credential values.
//!
//! `AuthError` is `Clone`: when a refresh fails, the same error is delivered
//! to the request that led the refresh and to every request queued behind it.
//!
//! # Example
//!
//! ```
//! use partnerlink::auth::AuthError;
//!
//! let err = AuthError::Refresh("refresh credential rejected (401)".to_string());
//! assert!(err.needs_reauth());
//! assert!(err.is_refresh_failure());
//! ```

use thiserror::Error;

/// Errors from authentication operations.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The backend rejected the identity token, or the exchange failed.
    #[error("login failed: {0}")]
    Login(String),

    /// The backend rejected the refresh credential (expired or revoked).
    #[error("session refresh rejected: {0}. Please sign in again.")]
    Refresh(String),

    /// The refresh call did not settle within the configured timeout.
    #[error("session refresh timed out after {0}s")]
    RefreshTimeout(u64),

    /// The refresh could not complete for a non-credential reason
    /// (transport failure, abandoned leader).
    #[error("session refresh failed: {0}")]
    RefreshFailed(String),

    /// A request was rejected with 401 after it had already been retried once.
    #[error("request unauthorized after session refresh")]
    Unauthorized,

    /// The revoke call failed. Local cleanup has still happened.
    #[error("revoke failed: {0}")]
    Revoke(String),

    /// No session is stored.
    #[error("not signed in. Run 'partnerlink auth login'.")]
    NotAuthenticated,

    /// Stored session data could not be decoded.
    #[error("invalid stored session: {0}")]
    InvalidSession(String),

    /// Error from secret storage.
    #[error("secret store error: {0}")]
    SecretStore(String),

    /// Network error while talking to the backend.
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected backend response on an auth endpoint.
    #[error("auth API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the backend
        message: String,
    },

    /// Internal error (should not happen).
    #[error("internal auth error: {0}")]
    Internal(String),
}

impl AuthError {
    /// True for errors that can only be resolved by signing in again.
    pub fn needs_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::Refresh(_)
                | AuthError::Unauthorized
                | AuthError::NotAuthenticated
                | AuthError::InvalidSession(_)
        )
    }

    /// True for failures that might succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AuthError::Network(_) | AuthError::RefreshTimeout(_) | AuthError::RefreshFailed(_)
        )
    }

    /// True for every way a refresh can fail.
    pub fn is_refresh_failure(&self) -> bool {
        matches!(
            self,
            AuthError::Refresh(_) | AuthError::RefreshTimeout(_) | AuthError::RefreshFailed(_)
        )
    }
}

impl From<crate::secrets::SecretError> for AuthError {
    fn from(err: crate::secrets::SecretError) -> Self {
        AuthError::SecretStore(err.to_string())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL; query strings may carry credentials on some backends.
        AuthError::Network(err.without_url().to_string())
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("blocking task failed: {}", err))
    }
}
