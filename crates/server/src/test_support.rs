use std::path::PathBuf;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use db::{DBService, models::role::Role};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{AppState, http};

/// File-backed sqlite database removed when the test finishes. An
/// in-memory url is not safe here because the pool hands every
/// connection its own empty database.
pub struct TempDbGuard {
    path: PathBuf,
}

impl Drop for TempDbGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub async fn test_app() -> (TempDbGuard, Router) {
    let path = std::env::temp_dir().join(format!("bs-test-{}.sqlite", Uuid::new_v4()));
    let db_url = format!("sqlite://{}?mode=rwc", path.to_string_lossy());
    let db = DBService::new(&db_url).await.unwrap();
    Role::seed(&db.conn).await.unwrap();

    let state = AppState::new(db);
    (TempDbGuard { path }, http::router(state))
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

pub fn project_payload(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "description": "Mixed-use development",
        "location": "Arequipa",
        "start_date": "01-06-2025",
        "expected_end_date": "01-06-2026",
        "budget": 750_000.0,
        "url_image": "https://example.com/site.png",
        "user_id": Uuid::new_v4(),
    })
}

pub async fn create_project(app: &Router, name: &str) -> Uuid {
    let (status, json) = send_json(
        app,
        "POST",
        "/api/v1/projects",
        Some(project_payload(name)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    json.pointer("/data/id")
        .and_then(|v| v.as_str())
        .and_then(|v| Uuid::parse_str(v).ok())
        .expect("created project id")
}
