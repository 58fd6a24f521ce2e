#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use survey_api::config::ServerConfig;
use survey_api::router::build_app_router;
use survey_api::state::AppState;

pub const SOUND_FOLDER: &str = "sound_files";

/// Build a test `ServerConfig` serving from `static_dir`.
pub fn test_config(static_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        db_max_connections: 5,
        static_dir: static_dir.to_path_buf(),
        sound_folder: SOUND_FOLDER.to_string(),
        default_batch_size: 10,
        cors_origins: vec!["http://localhost:5000".parse().unwrap()],
        request_timeout_secs: 30,
    }
}

/// Create a static directory holding an index page and the given sample files.
pub fn static_dir_with_samples(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>survey</html>").unwrap();
    let sounds = dir.path().join(SOUND_FOLDER);
    std::fs::create_dir(&sounds).unwrap();
    for file in files {
        std::fs::write(sounds.join(file), b"RIFF").unwrap();
    }
    dir
}

/// Build the full application router (same middleware stack as production).
pub fn build_test_app(pool: PgPool, static_dir: &Path) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config(static_dir)),
    };
    build_app_router(state)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
