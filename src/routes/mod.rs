pub mod alarms;
pub mod groups;
pub mod health;
pub mod metrics;
pub mod pages;
pub mod workers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(pages::index))
        .route("/group/{id}", get(pages::view_group))
        .route("/timer", get(pages::timer))
        // Alarms
        .route("/api/alarms", get(alarms::api_alarms))
        .route("/add", post(alarms::add_alarm))
        .route("/delete/{id}", get(alarms::delete_alarm))
        .route("/toggle_done/{id}", post(alarms::toggle_done))
        // Groups
        .route("/add_group", post(groups::add_group))
        .route("/delete_group/{id}", post(groups::delete_group))
        // Notification workers
        .route("/service-worker.js", get(workers::service_worker))
        .route("/alarm-worker.js", get(workers::alarm_worker))
        .nest_service("/static", static_files)
        // Operations
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
