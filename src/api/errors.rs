//! api::errors
//!
//! Error type for requests sent through [`ApiClient`](super::ApiClient).

use thiserror::Error;

use crate::auth::AuthError;

/// Errors from backend API calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Session problem: refresh failed, or the request was still
    /// unauthorized after a refresh.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the backend
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// Response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Client construction failed.
    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

impl ApiError {
    /// HTTP status, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 404 responses.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// True when the user must sign in again.
    pub fn needs_reauth(&self) -> bool {
        matches!(self, ApiError::Auth(e) if e.needs_reauth())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.without_url().to_string())
    }
}
