//! auth::client
//!
//! HTTP client for the backend's auth endpoints.
//!
//! # Endpoints
//!
//! | operation | request                                        |
//! |-----------|------------------------------------------------|
//! | login     | `POST /Auth/GoogleLogin` `{"idToken": "..."}`  |
//! | refresh   | `POST /Auth/Refresh` `{}`                      |
//! | revoke    | `POST /Auth/Revoke` `{}`                       |
//! | register  | `POST /Auth/Register` (caller JSON)            |
//!
//! # Refresh Credential
//!
//! Login sets an HTTP-only refresh cookie. The shared `reqwest::Client` is
//! built with a cookie store (see [`crate::api::build_http_client`]), so the
//! cookie rides along on refresh and revoke. The expiring bearer token is
//! never sent to the refresh endpoint.
//!
//! # Example
//!
//! ```ignore
//! use partnerlink::auth::AuthClient;
//!
//! let auth = AuthClient::new(http, "https://backend.example/api", store);
//! let session = auth.login(&google_id_token).await?;
//! assert!(session.is_authenticated());
//! ```

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::errors::AuthError;
use super::refresh::{RefreshCoordinator, RefreshTurn};
use super::session::Session;
use super::session_controller::SessionListener;
use super::token_store::TokenStore;

const LOGIN_PATH: &str = "/Auth/GoogleLogin";
const REFRESH_PATH: &str = "/Auth/Refresh";
const REVOKE_PATH: &str = "/Auth/Revoke";
const REGISTER_PATH: &str = "/Auth/Register";

/// Successful login/refresh payload.
///
/// Only `token` and `userId` are interpreted; every other field is kept as
/// the profile record.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,

    #[serde(rename = "userId")]
    user_id: Option<Value>,

    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TokenResponse {
    /// The `userId` as a non-negative integer, either JSON number or
    /// numeric string. Anything else is logged and dropped.
    fn user_id(&self) -> Option<u64> {
        let raw = self.user_id.as_ref()?;
        let parsed = match raw {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        if parsed.is_none() && !raw.is_null() {
            warn!(user_id = %raw, "ignoring userId that is not a non-negative integer");
        }
        parsed
    }
}

/// Error body shapes the backend uses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    title: Option<String>,
}

/// Client for login, refresh, and revocation.
///
/// Owns the [`RefreshCoordinator`], so every request pipeline built on the
/// same `AuthClient` shares one single-flight refresh.
pub struct AuthClient {
    http: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    coordinator: RefreshCoordinator,
    listeners: RwLock<Vec<Arc<dyn SessionListener>>>,
}

impl AuthClient {
    /// Create an auth client.
    ///
    /// # Arguments
    ///
    /// * `http` - Shared HTTP client (must have a cookie store)
    /// * `base_url` - API base, e.g. `https://backend.example/api`
    /// * `store` - Session persistence
    pub fn new(http: Client, base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            coordinator: RefreshCoordinator::new(),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Override the refresh timeout.
    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.coordinator = RefreshCoordinator::with_timeout(timeout);
        self
    }

    /// Register a listener notified after login and logout complete.
    pub fn add_listener(&self, listener: Arc<dyn SessionListener>) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push(listener);
        }
    }

    /// The session store.
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// The shared HTTP client.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// API base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The refresh coordinator.
    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Absolute URL for an API path (`/Auth/Refresh`).
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn notify_listeners(&self) {
        let listeners: Vec<_> = match self.listeners.read() {
            Ok(l) => l.clone(),
            Err(_) => return,
        };
        for listener in listeners {
            listener.session_changed().await;
        }
    }

    /// Exchange an identity-provider token for a backend session.
    ///
    /// Persists the bearer token and `userId` (when present); remaining
    /// response fields become `user_info`.
    ///
    /// # Errors
    ///
    /// [`AuthError::Login`] when the backend rejects the token, the response
    /// carries no token, or the network call fails. Nothing is persisted in
    /// that case.
    pub async fn login(&self, identity_token: &str) -> Result<Session, AuthError> {
        let response = self
            .http
            .post(self.url(LOGIN_PATH))
            .header(ACCEPT, "application/json")
            .json(&serde_json::json!({ "idToken": identity_token }))
            .send()
            .await
            .map_err(|e| AuthError::Login(format!("network error: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Login(format!("network error: {}", e.without_url())))?;

        if !status.is_success() {
            return Err(AuthError::Login(format!(
                "identity token rejected ({}): {}",
                status.as_u16(),
                error_message(&body)
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::Login(format!("unexpected login response: {}", e)))?;
        let user_id = parsed.user_id();
        let token = parsed
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Login("login response carried no token".into()))?;

        let session = Session {
            bearer_token: Some(token),
            user_id,
            user_info: (!parsed.rest.is_empty()).then(|| Value::Object(parsed.rest)),
        };

        self.store.set(&session).await?;
        self.coordinator.invalidate();
        info!(user_id = ?session.user_id, "signed in");
        self.notify_listeners().await;
        Ok(session)
    }

    /// Mint a new bearer token using the refresh cookie, and persist it.
    ///
    /// This is the raw call; request pipelines go through
    /// [`refresh_shared`](Self::refresh_shared).
    ///
    /// # Errors
    ///
    /// - [`AuthError::Refresh`] when the backend rejects the refresh
    ///   credential or returns no token
    /// - [`AuthError::RefreshFailed`] on transport failure
    pub async fn refresh(&self) -> Result<String, AuthError> {
        debug!("refreshing bearer token");
        let response = self
            .http
            .post(self.url(REFRESH_PATH))
            .header(ACCEPT, "application/json")
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| AuthError::RefreshFailed(format!("network error: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::RefreshFailed(format!("network error: {}", e.without_url())))?;

        if !status.is_success() {
            let reason = match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "refresh credential rejected",
                _ => "refresh endpoint error",
            };
            return Err(AuthError::Refresh(format!(
                "{} ({}): {}",
                reason,
                status.as_u16(),
                error_message(&body)
            )));
        }

        let token = serde_json::from_str::<TokenResponse>(&body)
            .ok()
            .and_then(|r| r.token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Refresh("refresh response carried no token".into()))?;

        self.store.set_bearer_token(&token).await?;
        info!("bearer token refreshed");
        Ok(token)
    }

    /// Single-flight refresh for request pipelines.
    ///
    /// `observed_generation` is [`RefreshCoordinator::generation`] captured
    /// before the failing request was sent. Exactly one concurrent caller
    /// performs the refresh; the rest wait for its outcome. When the refresh
    /// fails, the leader signs out (best-effort revoke, store cleared,
    /// listeners notified) before the in-flight flag is reset.
    pub async fn refresh_shared(&self, observed_generation: u64) -> Result<String, AuthError> {
        match self.coordinator.enter(observed_generation) {
            RefreshTurn::Ready(token) => Ok(token),
            RefreshTurn::Wait(waiter) => {
                debug!("refresh in flight, queued");
                waiter.wait().await
            }
            RefreshTurn::Lead(mut lease) => {
                let outcome = lease.run(self.refresh()).await;
                if let Err(ref err) = outcome {
                    warn!(error = %err, "session refresh failed, signing out");
                    if let Err(clear_err) = self.logout().await {
                        warn!(error = %clear_err, "failed to clear session after refresh failure");
                    }
                }
                lease.settle(outcome.clone());
                outcome
            }
        }
    }

    /// Revoke the refresh credential remotely, then clear the local session.
    ///
    /// Local cleanup always happens, even when the remote call fails.
    ///
    /// # Errors
    ///
    /// - Store errors from clearing the session (checked first)
    /// - [`AuthError::Revoke`] when only the remote call failed
    pub async fn revoke(&self) -> Result<(), AuthError> {
        let remote = self.revoke_remote().await;

        let cleared = self.store.clear().await;
        self.coordinator.invalidate();
        self.notify_listeners().await;
        cleared?;

        info!("signed out");
        remote
    }

    /// Sign out. Remote revocation is best-effort and never fails the call.
    pub async fn logout(&self) -> Result<(), AuthError> {
        match self.revoke().await {
            Err(AuthError::Revoke(reason)) => {
                warn!(%reason, "revoke failed; local session cleared anyway");
                Ok(())
            }
            other => other,
        }
    }

    async fn revoke_remote(&self) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.url(REVOKE_PATH))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| AuthError::Revoke(format!("network error: {}", e.without_url())))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(AuthError::Revoke(format!(
                "{}: {}",
                status.as_u16(),
                error_message(&body)
            )))
        }
    }

    /// Create a backend account. The payload is passed through unchanged.
    pub async fn register(&self, payload: &Value) -> Result<Value, AuthError> {
        let response = self
            .http
            .post(self.url(REGISTER_PATH))
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| AuthError::Api {
            status: status.as_u16(),
            message: format!("failed to parse register response: {}", e),
        })
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

/// Best-effort human message from an error body.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(msg) = parsed.message.or(parsed.title) {
            return msg;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no details".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_extracts_user_id_variants() {
        let numeric: TokenResponse =
            serde_json::from_str(r#"{"token":"t","userId":42}"#).expect("parse");
        assert_eq!(numeric.user_id(), Some(42));

        let text: TokenResponse =
            serde_json::from_str(r#"{"token":"t","userId":"42"}"#).expect("parse");
        assert_eq!(text.user_id(), Some(42));

        let missing: TokenResponse = serde_json::from_str(r#"{"token":"t"}"#).expect("parse");
        assert_eq!(missing.user_id(), None);
    }

    #[test]
    fn token_response_rejects_unusable_user_ids() {
        for raw in [r#"-7"#, r#"4.5"#, r#""abc""#, r#"true"#, r#"null"#] {
            let body = format!(r#"{{"token":"t","userId":{}}}"#, raw);
            let parsed: TokenResponse = serde_json::from_str(&body).expect("parse");
            assert_eq!(parsed.user_id(), None, "userId {}", raw);
            assert!(!parsed.rest.contains_key("userId"));
        }
    }

    #[test]
    fn token_response_keeps_profile_fields() {
        let parsed: TokenResponse = serde_json::from_str(
            r#"{"token":"t","userId":1,"email":"ana@example.com","name":"Ana"}"#,
        )
        .expect("parse");

        assert_eq!(parsed.rest.len(), 2);
        assert!(!parsed.rest.contains_key("token"));
        assert!(!parsed.rest.contains_key("userId"));
    }

    #[test]
    fn error_message_prefers_json_fields() {
        assert_eq!(error_message(r#"{"message":"Invalid token"}"#), "Invalid token");
        assert_eq!(error_message(r#"{"title":"Unauthorized"}"#), "Unauthorized");
        assert_eq!(error_message("plain text"), "plain text");
        assert_eq!(error_message("   "), "no details");
    }

    #[test]
    fn error_message_is_bounded() {
        let long = "x".repeat(1000);
        assert_eq!(error_message(&long).len(), 200);
    }
}
