//! Integration tests for login, refresh, revoke, and the session controller.

mod common;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::Harness;
use partnerlink::auth::AuthError;

// =============================================================================
// Login
// =============================================================================

mod login {
    use super::*;

    #[tokio::test]
    async fn login_persists_session_and_flips_controller() {
        let h = Harness::start().await;
        h.controller.startup().await;
        assert!(!h.controller.is_authenticated());

        Mock::given(method("POST"))
            .and(path("/Auth/GoogleLogin"))
            .and(body_json(json!({"idToken": "tok123"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "bearerABC",
                "userId": 42,
                "email": "ana@example.com"
            })))
            .expect(1)
            .mount(&h.server)
            .await;

        let session = h.auth.login("tok123").await.unwrap();

        assert_eq!(session.bearer_token.as_deref(), Some("bearerABC"));
        assert_eq!(session.user_id, Some(42));
        assert_eq!(session.user_info, Some(json!({"email": "ana@example.com"})));

        let stored = h.store.get().await.unwrap();
        assert_eq!(stored, session);
        assert!(h.controller.is_authenticated());
        assert_eq!(h.listener.calls(), 1);
        h.server.verify().await;
    }

    #[tokio::test]
    async fn rejected_identity_token_persists_nothing() {
        let h = Harness::start().await;
        Mock::given(method("POST"))
            .and(path("/Auth/GoogleLogin"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid Google token"})),
            )
            .mount(&h.server)
            .await;

        let err = h.auth.login("forged").await.unwrap_err();

        match err {
            AuthError::Login(msg) => assert!(msg.contains("Invalid Google token")),
            other => panic!("expected login error, got {:?}", other),
        }
        assert!(h.store.get().await.unwrap().is_empty());
        assert_eq!(h.listener.calls(), 0);
    }

    #[tokio::test]
    async fn response_without_token_is_a_login_error() {
        let h = Harness::start().await;
        Mock::given(method("POST"))
            .and(path("/Auth/GoogleLogin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"userId": 42})))
            .mount(&h.server)
            .await;

        assert!(matches!(
            h.auth.login("tok123").await,
            Err(AuthError::Login(_))
        ));
        assert!(h.store.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn relogin_discards_token_minted_for_previous_session() {
        let h = Harness::signed_in("expired").await;
        let before_refresh = h.auth.coordinator().generation();

        h.reject_token("/EPartner/ReadAll", "expired").await;
        h.accept_token("/EPartner/ReadAll", "userA_T1", json!([])).await;
        Mock::given(method("POST"))
            .and(path("/Auth/Refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "userA_T1"})))
            .up_to_n_times(1)
            .mount(&h.server)
            .await;
        h.resources
            .list(partnerlink::api::Resource::Partner)
            .await
            .unwrap();

        Mock::given(method("POST"))
            .and(path("/Auth/GoogleLogin"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"token": "userB_L", "userId": 7})),
            )
            .mount(&h.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/Auth/Refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "userB_T2"})))
            .mount(&h.server)
            .await;
        h.auth.login("idB").await.unwrap();
        assert!(h.auth.coordinator().generation() > before_refresh + 1);

        // A 401 observed under the first session must not reuse its token.
        let token = h.auth.refresh_shared(before_refresh).await.unwrap();

        assert_eq!(token, "userB_T2");
        assert_eq!(
            h.store.get().await.unwrap().bearer_token.as_deref(),
            Some("userB_T2")
        );
        assert_eq!(h.auth.coordinator().cycles(), 2);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_login_error() {
        let h = Harness::start().await;
        let dead = partnerlink::auth::AuthClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            h.store.clone(),
        );

        assert!(matches!(dead.login("tok123").await, Err(AuthError::Login(_))));
    }
}

// =============================================================================
// Refresh
// =============================================================================

mod refresh {
    use super::*;

    #[tokio::test]
    async fn refresh_sends_login_cookie_not_bearer_token() {
        let h = Harness::start().await;
        Mock::given(method("POST"))
            .and(path("/Auth/GoogleLogin"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "refreshToken=r-123; Path=/; HttpOnly")
                    .set_body_json(json!({"token": "bearerABC", "userId": 42})),
            )
            .mount(&h.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/Auth/Refresh"))
            .and(header("cookie", "refreshToken=r-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "bearerXYZ"})))
            .expect(1)
            .mount(&h.server)
            .await;

        h.auth.login("tok123").await.unwrap();
        let token = h.auth.refresh().await.unwrap();

        assert_eq!(token, "bearerXYZ");
        let session = h.store.get().await.unwrap();
        assert_eq!(session.bearer_token.as_deref(), Some("bearerXYZ"));
        assert_eq!(session.user_id, Some(42));

        let requests = h.server.received_requests().await.unwrap();
        let refresh = requests
            .iter()
            .find(|r| r.url.path() == "/Auth/Refresh")
            .expect("refresh request");
        assert!(!refresh.headers.contains_key("authorization"));
        h.server.verify().await;
    }

    #[tokio::test]
    async fn rejected_refresh_is_reported() {
        let h = Harness::signed_in("expired").await;
        h.refresh_rejected(Duration::ZERO, 1).await;

        let err = h.auth.refresh().await.unwrap_err();

        assert!(matches!(err, AuthError::Refresh(_)));
        assert!(err.needs_reauth());
        // The raw call does not sign out; that is the pipeline's job.
        assert!(h.store.get().await.unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn shared_refresh_failure_signs_out() {
        let h = Harness::signed_in("expired").await;
        h.refresh_rejected(Duration::ZERO, 1).await;
        h.revoke_answers(401).await;

        let err = h
            .auth
            .refresh_shared(h.auth.coordinator().generation())
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Refresh(_)));
        assert!(h.store.get().await.unwrap().is_empty());
        assert!(!h.controller.is_authenticated());
        assert_eq!(h.listener.calls(), 1);
    }
}

// =============================================================================
// Revoke and logout
// =============================================================================

mod revoke {
    use super::*;

    #[tokio::test]
    async fn logout_clears_session_and_notifies() {
        let h = Harness::signed_in("bearerABC").await;
        Mock::given(method("POST"))
            .and(path("/Auth/Revoke"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&h.server)
            .await;

        h.auth.logout().await.unwrap();

        assert!(h.store.get().await.unwrap().is_empty());
        assert!(!h.controller.is_authenticated());
        assert_eq!(h.listener.calls(), 1);
        h.server.verify().await;
    }

    #[tokio::test]
    async fn revoke_failure_still_clears_locally() {
        let h = Harness::signed_in("bearerABC").await;
        h.revoke_answers(500).await;

        let err = h.auth.revoke().await.unwrap_err();

        assert!(matches!(err, AuthError::Revoke(_)));
        assert!(h.store.get().await.unwrap().is_empty());
        assert!(!h.controller.is_authenticated());
    }

    #[tokio::test]
    async fn logout_ignores_revoke_failure() {
        let h = Harness::signed_in("bearerABC").await;
        h.revoke_answers(503).await;

        h.auth.logout().await.unwrap();

        assert!(h.store.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn logout_twice_is_harmless() {
        let h = Harness::signed_in("bearerABC").await;
        h.revoke_answers(200).await;

        h.auth.logout().await.unwrap();
        h.auth.logout().await.unwrap();

        assert!(h.store.get().await.unwrap().is_empty());
    }
}

// =============================================================================
// Register
// =============================================================================

mod register {
    use super::*;

    #[tokio::test]
    async fn register_passes_payload_through() {
        let h = Harness::start().await;
        let payload = json!({"email": "ana@example.com", "name": "Ana"});
        Mock::given(method("POST"))
            .and(path("/Auth/Register"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
            .expect(1)
            .mount(&h.server)
            .await;

        let created = h.auth.register(&payload).await.unwrap();

        assert_eq!(created, json!({"id": 7}));
        h.server.verify().await;
    }

    #[tokio::test]
    async fn register_conflict_is_an_api_error() {
        let h = Harness::start().await;
        Mock::given(method("POST"))
            .and(path("/Auth/Register"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "exists"})))
            .mount(&h.server)
            .await;

        match h.auth.register(&json!({})).await {
            Err(AuthError::Api { status, message }) => {
                assert_eq!(status, 409);
                assert_eq!(message, "exists");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }
}
