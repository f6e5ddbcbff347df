use axum::{extract::State, http::StatusCode};

use crate::{services::metrics, AppState};

/// GET /metrics. Prometheus scrape endpoint. Storage gauges are refreshed per scrape.
pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    if let Err(e) = metrics::collect(&state.db).await {
        tracing::warn!("Metrics: collection failed: {}", e);
    }
    metrics::render().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
