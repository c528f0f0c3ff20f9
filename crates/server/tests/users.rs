use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use shared::types::Uuid;

mod helpers;
use helpers::TestApp;

#[tokio::test]
async fn test_ping() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_created_user_is_listed() {
    let app = TestApp::new();

    let (status, created) = app
        .post_json("/api/users", json!({ "username": "fcc_test" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["username"], "fcc_test");
    let id = created["_id"].as_str().unwrap();
    assert!(Uuid::parse(id).is_ok());

    let (status, users) = app.get("/api/users").await;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "fcc_test");
    assert_eq!(users[0]["_id"], id);
    assert!(users[0]["creation_date"].is_string());
}

#[tokio::test]
async fn test_users_are_listed_in_creation_order() {
    let app = TestApp::new();
    let first = app.create_user("first").await;
    let second = app.create_user("second").await;
    // Duplicates are allowed and get their own id
    let third = app.create_user("first").await;
    assert_ne!(first, third);

    let (_, users) = app.get("/api/users").await;
    let ids: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str(), third.as_str()]);
}

#[tokio::test]
async fn test_create_user_from_form() {
    let app = TestApp::new();
    let (status, body) = app.post_form("/api/users", "username=form_user").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "form_user");
}

#[tokio::test]
async fn test_missing_username_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app.post_json("/api/users", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "username is required" }));

    let (_, users) = app.get("/api/users").await;
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn test_unsupported_content_type() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/users")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from("username=nope"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"].as_str().unwrap().contains("application/json"));
}

#[tokio::test]
async fn test_malformed_json_is_a_json_error() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"username\":"))
                .unwrap(),
        )
        .await;
    assert!(status.is_client_error());
    assert!(body["error"].is_string());
}
