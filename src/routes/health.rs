use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{models::group::DEFAULT_GROUP_NAME, services::groups::GroupService, AppState};

/// GET /health. Store reachable and the default group in place.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match GroupService::exists_by_name(&state.db, DEFAULT_GROUP_NAME).await {
        Ok(default_group) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "db": "connected", "default_group": default_group })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "db": e.to_string() })),
        ),
    }
}
