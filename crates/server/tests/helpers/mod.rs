//! Drives the real router in-process against a throwaway database
#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use clap::Parser;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server::{cli::Cli, db, routes, AppState};
use shared::api::Object;
use tempfile::TempDir;
use tower::ServiceExt;

pub const INDEX_HTML: &str = "<h1>Exercise tracker</h1>";
pub const STYLE_CSS: &str = "body { margin: 0; }";

pub struct TestApp {
    pub router: Router,
    pub db_path: PathBuf,
    // Keeps the database alive until the test finishes
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.sqlite");
        let conn_str = db_path.to_str().unwrap().to_string();

        db::run_migrations(&conn_str).unwrap();
        let pool = db::create_pool(&conn_str).unwrap();

        let assets_dir = dir.path().join("public");
        std::fs::create_dir(&assets_dir).unwrap();
        std::fs::write(assets_dir.join("style.css"), STYLE_CSS).unwrap();
        let index_file = dir.path().join("index.html");
        std::fs::write(&index_file, INDEX_HTML).unwrap();

        let args = Cli::try_parse_from([
            "server",
            "--sqlite-connection-string",
            &conn_str,
            "--assets-dir",
            assets_dir.to_str().unwrap(),
            "--index-file",
            index_file.to_str().unwrap(),
        ])
        .unwrap();

        let router = routes::app(AppState::new(pool), &args).unwrap();

        Self {
            router,
            db_path,
            _dir: dir,
        }
    }

    /// Sends the request and returns the status and the body as text
    pub async fn send_raw(&self, req: Request<Body>) -> (StatusCode, String) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "Response ({status}) wasn't json: {}",
                String::from_utf8_lossy(&bytes)
            )
        });
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
                )
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Creates a user and returns its id
    pub async fn create_user(&self, username: &str) -> String {
        let (status, body) = self
            .post_json(Object::Users.path(), json!({ "username": username }))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["_id"].as_str().unwrap().to_string()
    }

    pub async fn add_exercise(&self, user_id: &str, description: &str, date: &str) -> Value {
        let (status, body) = self
            .post_json(
                &Object::UserExercises.id_path(user_id),
                json!({ "description": description, "duration": 10, "date": date }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body
    }

    pub fn exercise_count(&self) -> i64 {
        let conn = rusqlite::Connection::open(&self.db_path).unwrap();
        conn.query_row("SELECT COUNT(*) FROM exercise", (), |row| row.get(0))
            .unwrap()
    }
}
