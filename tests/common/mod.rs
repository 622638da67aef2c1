//! Shared fixtures for integration tests.
//!
//! Every harness gets its own mock backend and its own file-backed secret
//! store in a temp directory, so tests never touch the real home directory.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use partnerlink::api::{build_http_client, ApiClient, ResourceClient, DEFAULT_USER_AGENT};
use partnerlink::auth::{
    AuthClient, SecretTokenStore, Session, SessionController, SessionListener, TokenStore,
};
use partnerlink::secrets::FileSecretStore;

/// Counts session-change notifications.
#[derive(Default)]
pub struct CountingListener {
    calls: AtomicUsize,
}

impl CountingListener {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionListener for CountingListener {
    async fn session_changed(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock backend plus a fully wired client stack.
pub struct Harness {
    pub server: MockServer,
    pub store: Arc<dyn TokenStore>,
    pub auth: Arc<AuthClient>,
    pub api: ApiClient,
    pub resources: ResourceClient,
    pub controller: Arc<SessionController>,
    pub listener: Arc<CountingListener>,
    _home: TempDir,
}

impl Harness {
    /// Signed-out stack with the default refresh timeout.
    pub async fn start() -> Self {
        Self::with_refresh_timeout(Duration::from_secs(30)).await
    }

    pub async fn with_refresh_timeout(timeout: Duration) -> Self {
        let server = MockServer::start().await;
        let home = TempDir::new().expect("temp dir");

        let secrets = Arc::new(FileSecretStore::with_path(home.path().join("secrets.toml")));
        let store: Arc<dyn TokenStore> = Arc::new(SecretTokenStore::new(secrets));

        let http = build_http_client(DEFAULT_USER_AGENT, Duration::from_secs(10))
            .expect("http client");
        let auth = Arc::new(
            AuthClient::new(http, server.uri(), Arc::clone(&store)).with_refresh_timeout(timeout),
        );

        let controller = Arc::new(SessionController::new(Arc::clone(&store)));
        let listener = Arc::new(CountingListener::default());
        auth.add_listener(controller.clone());
        auth.add_listener(listener.clone());

        let api = ApiClient::new(Arc::clone(&auth));
        let resources = ResourceClient::new(api.clone());

        Self {
            server,
            store,
            auth,
            api,
            resources,
            controller,
            listener,
            _home: home,
        }
    }

    /// Stack with a stored session carrying `token`.
    pub async fn signed_in(token: &str) -> Self {
        let harness = Self::start().await;
        harness
            .store
            .set(&Session {
                bearer_token: Some(token.to_string()),
                user_id: Some(42),
                user_info: Some(json!({"email": "ana@example.com"})),
            })
            .await
            .expect("seed session");
        harness.controller.startup().await;
        harness
    }

    /// `GET {route}` answers 401 for `Bearer {expired}`.
    pub async fn reject_token(&self, route: &str, expired: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("authorization", format!("Bearer {}", expired).as_str()))
            .respond_with(ResponseTemplate::new(401))
            .mount(&self.server)
            .await;
    }

    /// `GET {route}` answers `body` for `Bearer {token}`.
    pub async fn accept_token(&self, route: &str, token: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("authorization", format!("Bearer {}", token).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Refresh endpoint minting `token`, expected to be called `times` times.
    pub async fn refresh_succeeds(&self, token: &str, delay: Duration, times: u64) {
        Mock::given(method("POST"))
            .and(path("/Auth/Refresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "token": token }))
                    .set_delay(delay),
            )
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Refresh endpoint rejecting the credential.
    pub async fn refresh_rejected(&self, delay: Duration, times: u64) {
        Mock::given(method("POST"))
            .and(path("/Auth/Refresh"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "message": "Refresh token expired" }))
                    .set_delay(delay),
            )
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Revoke endpoint answering `status`.
    pub async fn revoke_answers(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/Auth/Revoke"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }
}
