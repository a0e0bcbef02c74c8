// Shared helpers for the HTTP integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use taskboard::{build_router, AppState, Database};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub db: Database,
    /// Keeps the export directory alive for the duration of the test
    pub export_dir: TempDir,
}

/// Fresh in-memory database, router and export directory
pub async fn spawn_app() -> TestApp {
    let db = Database::open_in_memory().await.unwrap();
    let export_dir = tempfile::tempdir().unwrap();
    let state = AppState::new(db.pool().clone(), export_dir.path());

    TestApp { router: build_router(state), db, export_dir }
}

impl TestApp {
    /// Send a request and decode the JSON response body (Null when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", uri, body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("PUT", uri, body)).await
    }

    /// POST each `(file name, contents)` pair as a `files` multipart part
    pub async fn upload(&self, uri: &str, files: &[(&str, &str)]) -> (StatusCode, Value) {
        self.send(multipart_request(uri, files)).await
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const BOUNDARY: &str = "taskboard-test-boundary";

pub fn multipart_request(uri: &str, files: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (file_name, contents) in files {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        body.push_str(&format!(
            "Content-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\n"
        ));
        body.push_str("Content-Type: text/csv\r\n\r\n");
        body.push_str(contents);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}
