//! Contributor and invitation routes

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::contributors::handlers;
use crate::features::contributors::services::ContributorService;

/// Create routes for the contributors feature (all require authentication)
pub fn routes(service: Arc<ContributorService>) -> Router {
    Router::new()
        .route(
            "/api/projects/{id}/contributors",
            post(handlers::invite_contributors).get(handlers::list_contributors),
        )
        .route(
            "/api/projects/{id}/contributors/permissions",
            patch(handlers::edit_permissions),
        )
        .route(
            "/api/projects/{id}/invitation",
            post(handlers::respond_to_invitation),
        )
        .route("/api/invitations", get(handlers::list_pending_invitations))
        .route(
            "/api/invitations/reconcile",
            post(handlers::reconcile_signup),
        )
        .with_state(service)
}
