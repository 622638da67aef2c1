//! Integration tests for the CRUD resource routes.

mod common;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::Harness;
use partnerlink::api::{ApiError, Resource};

async fn mount(h: &Harness, verb: &str, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method(verb))
        .and(path(route))
        .and(header("authorization", "Bearer bearerABC"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(&h.server)
        .await;
}

#[tokio::test]
async fn list_uses_read_all_for_every_kind() {
    let h = Harness::signed_in("bearerABC").await;
    for (resource, route) in [
        (Resource::Partner, "/EPartner/ReadAll"),
        (Resource::Project, "/Project/ReadAll"),
        (Resource::Contact, "/Contact/ReadAll"),
        (Resource::Activity, "/EActivity/ReadAll"),
    ] {
        mount(&h, "GET", route, 200, json!([{"kind": resource.to_string()}])).await;
    }

    for resource in Resource::ALL {
        let listed = h.resources.list(resource).await.unwrap();
        assert_eq!(listed, json!([{"kind": resource.to_string()}]));
    }
    h.server.verify().await;
}

#[tokio::test]
async fn crud_routes_use_expected_methods() {
    let h = Harness::signed_in("bearerABC").await;
    let body = json!({"title": "Capstone"});

    mount(&h, "GET", "/Project/Read/3", 200, json!({"id": 3})).await;
    Mock::given(method("POST"))
        .and(path("/Project/Create"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 4})))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/Project/Update/4"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4})))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/Project/Delete/4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    let api = &h.resources;
    assert_eq!(api.get(Resource::Project, 3).await.unwrap(), json!({"id": 3}));
    assert_eq!(
        api.create(Resource::Project, body.clone()).await.unwrap(),
        json!({"id": 4})
    );
    assert_eq!(
        api.update(Resource::Project, 4, body.clone()).await.unwrap(),
        json!({"id": 4})
    );
    assert_eq!(api.delete(Resource::Project, 4).await.unwrap(), serde_json::Value::Null);
    h.server.verify().await;
}

#[tokio::test]
async fn activities_by_partner() {
    let h = Harness::signed_in("bearerABC").await;
    mount(
        &h,
        "GET",
        "/EActivity/ReadByPartnerId/5",
        200,
        json!([{"id": 1, "ePartnerId": 5}]),
    )
    .await;

    let activities = h.resources.activities_for_partner(5).await.unwrap();

    assert_eq!(activities[0]["ePartnerId"], 5);
    h.server.verify().await;
}

#[tokio::test]
async fn users_and_current_user() {
    let h = Harness::signed_in("bearerABC").await;
    mount(&h, "GET", "/User", 200, json!([{"id": 42}])).await;
    mount(&h, "GET", "/User/42", 200, json!({"id": 42})).await;
    mount(&h, "GET", "/Auth/Me", 200, json!({"id": 42, "name": "Ana"})).await;

    assert_eq!(h.resources.users().await.unwrap(), json!([{"id": 42}]));
    assert_eq!(h.resources.user(42).await.unwrap(), json!({"id": 42}));
    assert_eq!(h.resources.current_user().await.unwrap()["name"], "Ana");
    h.server.verify().await;
}

#[tokio::test]
async fn missing_record_is_not_found() {
    let h = Harness::signed_in("bearerABC").await;
    mount(&h, "GET", "/Contact/Read/99", 404, json!({"title": "Not Found"})).await;

    let err = h.resources.get(Resource::Contact, 99).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, ApiError::Status { ref message, .. } if message == "Not Found"));
}
