//! api::client
//!
//! Request pipeline with bearer attachment and refresh-and-replay on 401.
//!
//! # Pipeline
//!
//! For every [`ApiRequest`]:
//!
//! 1. Capture the refresh generation, then read the stored bearer token and
//!    attach it as `Authorization: Bearer ...` when present
//! 2. Dispatch
//! 3. Any status other than 401 is returned as-is
//! 4. First 401: go through [`AuthClient::refresh_shared`]. One caller
//!    refreshes; concurrent callers queue behind it. On success the request
//!    is replayed with the new token. On failure the session has already been
//!    cleared and the refresh error is returned
//! 5. 401 on the replay: [`AuthError::Unauthorized`], no second refresh

use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, debug_span, warn, Instrument};
use uuid::Uuid;

use super::errors::ApiError;
use super::request::ApiRequest;
use crate::auth::{error_message, AuthClient, AuthError};

/// Backend client that keeps the session alive across token expiry.
///
/// Cheap to clone; clones share the [`AuthClient`] and therefore the
/// single-flight refresh.
#[derive(Debug, Clone)]
pub struct ApiClient {
    auth: Arc<AuthClient>,
}

impl ApiClient {
    pub fn new(auth: Arc<AuthClient>) -> Self {
        Self { auth }
    }

    /// The auth client this pipeline refreshes through.
    pub fn auth(&self) -> &Arc<AuthClient> {
        &self.auth
    }

    /// Send a request through the pipeline and return the raw response.
    ///
    /// Non-success statuses other than 401 are not errors here.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Auth`] when refresh fails or the replay is still 401
    /// - [`ApiError::Network`] on transport failure
    pub async fn send(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let span = debug_span!(
            "api_request",
            id = %Uuid::new_v4(),
            method = %request.method,
            path = %request.path,
        );
        self.send_inner(request).instrument(span).await
    }

    async fn send_inner(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        // Generation first: a refresh landing between these two reads must
        // not be mistaken for one that predates our token.
        let observed = self.auth.coordinator().generation();
        let mut token = self.auth.store().get().await?.bearer_token;
        let mut retried = false;

        loop {
            let response = self.dispatch(request, token.as_deref()).await?;
            if response.status() != StatusCode::UNAUTHORIZED {
                debug!(status = response.status().as_u16(), retried, "response");
                return Ok(response);
            }

            if retried {
                warn!("still unauthorized after refresh");
                return Err(AuthError::Unauthorized.into());
            }

            debug!("401, refreshing session");
            retried = true;
            token = Some(self.auth.refresh_shared(observed).await?);
            debug!("replaying request");
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut builder = self
            .auth
            .http()
            .request(request.method.clone(), self.auth.url(&request.path))
            .header(ACCEPT, "application/json");

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    /// Send a request and decode a successful JSON response.
    ///
    /// An empty body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Everything [`send`](Self::send) returns, plus
    /// [`ApiError::Status`] for non-success responses and
    /// [`ApiError::Decode`] for bodies that do not match `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let decoded = if body.trim().is_empty() {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_str(&body)
        };
        decoded.map_err(|e| ApiError::Decode(e.to_string()))
    }
}
