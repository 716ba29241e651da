use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::features::daily_reports::handlers;
use crate::features::daily_reports::services::DailyReportService;

/// Create routes for the daily reports feature (all require authentication)
pub fn routes(service: Arc<DailyReportService>) -> Router {
    Router::new()
        .route(
            "/api/projects/{id}/reports",
            post(handlers::create_report).get(handlers::list_project_reports),
        )
        .route(
            "/api/reports/{id}",
            get(handlers::get_report).delete(handlers::delete_report),
        )
        .route(
            "/api/reports/{id}/contents",
            put(handlers::replace_report_contents),
        )
        .route(
            "/api/reports/{id}/status",
            patch(handlers::update_report_status),
        )
        .with_state(service)
}
