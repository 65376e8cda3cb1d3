//! HTTP-level tests for the `/services` resource.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, patch_json_auth, post_json_auth, put_json_auth,
};
use serde_json::json;
use statuspage_core::roles::Role;

#[tokio::test]
async fn list_requires_authentication() {
    let test = common::build_test_app().await;

    let response = get(&test.app, "/api/v1/services").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let test = common::build_test_app().await;
    let mut config = test.config.jwt.clone();
    config.secret = "some-other-secret".into();
    let principal =
        statuspage_core::principal::Principal::new(uuid::Uuid::new_v4(), test.acme, Role::Admin);
    let forged = statuspage_api::auth::jwt::generate_access_token(&principal, &config).unwrap();

    let response = get_auth(&test.app, "/api/v1/services", &forged).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_returns_only_own_services_by_name() {
    let test = common::build_test_app().await;
    let token = test.token(test.acme, Role::Member);

    let response = get_auth(&test.app, "/api/v1/services", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["API", "Database", "Website"]);
    assert!(json["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["organizationId"] == test.acme.to_string()));
}

#[tokio::test]
async fn create_then_set_status_appends_history() {
    let test = common::build_test_app().await;
    let token = test.acme_admin();

    let response = post_json_auth(
        &test.app,
        "/api/v1/services",
        json!({ "name": "CDN" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["status"], "operational");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = put_json_auth(
        &test.app,
        &format!("/api/v1/services/{id}/status"),
        json!({ "status": "major-outage" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "major-outage");

    let response = get_auth(&test.app, &format!("/api/v1/services/{id}/history"), &token).await;
    let history = body_json(response).await;
    let statuses: Vec<_> = history["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["status"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(statuses, ["major-outage", "operational"]);
}

#[tokio::test]
async fn unknown_status_string_is_a_validation_error() {
    let test = common::build_test_app().await;
    let token = test.acme_admin();
    let id = test.service_id(test.acme, "API").await;

    let response = put_json_auth(
        &test.app,
        &format!("/api/v1/services/{id}/status"),
        json!({ "status": "on-fire" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn member_cannot_change_status() {
    let test = common::build_test_app().await;
    let token = test.token(test.acme, Role::Member);
    let id = test.service_id(test.acme, "API").await;

    let response = put_json_auth(
        &test.app,
        &format!("/api/v1/services/{id}/status"),
        json!({ "status": "major-outage" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn other_tenant_cannot_touch_service() {
    let test = common::build_test_app().await;
    let intruder = test.techstart_admin();
    let id = test.service_id(test.acme, "Database").await;

    let response = put_json_auth(
        &test.app,
        &format!("/api/v1/services/{id}/status"),
        json!({ "status": "operational" }),
        &intruder,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Access denied");

    let response = get_auth(&test.app, &format!("/api/v1/services/{id}"), &intruder).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Unchanged for the owner.
    let owner = test.acme_admin();
    let response = get_auth(&test.app, &format!("/api/v1/services/{id}"), &owner).await;
    assert_eq!(
        body_json(response).await["data"]["status"],
        "degraded-performance"
    );
}

#[tokio::test]
async fn missing_service_is_404() {
    let test = common::build_test_app().await;
    let token = test.acme_admin();

    let response = get_auth(
        &test.app,
        &format!("/api/v1/services/{}", uuid::Uuid::new_v4()),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_renames_and_empty_patch_is_rejected() {
    let test = common::build_test_app().await;
    let token = test.acme_admin();
    let id = test.service_id(test.acme, "Website").await;

    let response = patch_json_auth(
        &test.app,
        &format!("/api/v1/services/{id}"),
        json!({ "name": "Marketing Site" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Marketing Site");

    let response = patch_json_auth(
        &test.app,
        &format!("/api/v1/services/{id}"),
        json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn overall_status_reflects_worst_service() {
    let test = common::build_test_app().await;

    let response = get_auth(&test.app, "/api/v1/services/overall", &test.acme_admin()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["overallStatus"],
        "degraded-performance"
    );

    let response = get_auth(
        &test.app,
        "/api/v1/services/overall",
        &test.techstart_admin(),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["overallStatus"], "operational");
}

#[tokio::test]
async fn delete_returns_204_and_removes_service() {
    let test = common::build_test_app().await;
    let token = test.acme_admin();
    let id = test.service_id(test.acme, "API").await;

    let response = delete_auth(&test.app, &format!("/api/v1/services/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(&test.app, &format!("/api/v1/services/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
