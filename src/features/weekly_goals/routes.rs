use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::weekly_goals::handlers;
use crate::features::weekly_goals::services::WeeklyGoalService;

/// Create routes for weekly goals and period queries (all require authentication)
pub fn routes(service: Arc<WeeklyGoalService>) -> Router {
    Router::new()
        .route("/api/periods/current", get(handlers::get_current_period))
        .route(
            "/api/projects/{id}/goals",
            get(handlers::list_goals).post(handlers::create_goals),
        )
        .route(
            "/api/projects/{id}/goals/current",
            get(handlers::get_current_goal).put(handlers::upsert_current_goal),
        )
        .route(
            "/api/projects/{id}/goals/period",
            get(handlers::get_goal_for_period).put(handlers::upsert_goal_for_period),
        )
        .route("/api/projects/{id}/goals/past", get(handlers::list_past_goals))
        .route(
            "/api/projects/{id}/reports/range",
            get(handlers::list_reports_in_range),
        )
        .route(
            "/api/goals/{id}",
            get(handlers::get_goal)
                .patch(handlers::update_goal)
                .delete(handlers::delete_goal),
        )
        .route("/api/goals/{id}/reports", get(handlers::get_goal_reports))
        .with_state(service)
}
