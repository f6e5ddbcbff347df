use std::path::PathBuf;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};

use crate::AppState;

pub const SERVICE_WORKER: &str = "service-worker.js";
pub const ALARM_WORKER: &str = "alarm-worker.js";

async fn serve_script(
    state: &AppState,
    file_name: &str,
    cache_control: &'static str,
) -> Result<Response<Body>, StatusCode> {
    let path = PathBuf::from(&state.config.static_dir).join(file_name);
    let data = tokio::fs::read(&path).await.map_err(|e| {
        tracing::warn!("Cannot read {}: {}", path.display(), e);
        if e.kind() == std::io::ErrorKind::NotFound {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime::APPLICATION_JAVASCRIPT.as_ref())
        .header(header::CACHE_CONTROL, cache_control)
        .body(Body::from(data))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// GET /service-worker.js. Never cached, so a new worker is picked up immediately.
pub async fn service_worker(State(state): State<AppState>) -> Result<Response<Body>, StatusCode> {
    serve_script(&state, SERVICE_WORKER, "no-cache, no-store, max-age=0").await
}

/// GET /alarm-worker.js
pub async fn alarm_worker(State(state): State<AppState>) -> Result<Response<Body>, StatusCode> {
    serve_script(&state, ALARM_WORKER, "no-cache").await
}
