use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::exports::handlers;
use crate::features::exports::services::ExportService;

/// Create export routes (all require authentication)
pub fn routes(service: Arc<ExportService>) -> Router {
    Router::new()
        .route("/api/goals/{id}/export", get(handlers::export_goal_reports))
        .route(
            "/api/projects/{id}/reports/export",
            get(handlers::export_project_reports),
        )
        .with_state(service)
}
