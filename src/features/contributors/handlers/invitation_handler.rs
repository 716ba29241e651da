use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::AuthenticatedUser;
use crate::features::contributors::dtos::{
    ContributorResponseDto, PendingInvitationDto, RespondInvitationDto,
};
use crate::features::contributors::services::ContributorService;
use crate::shared::types::{ApiResponse, Meta};

/// Accept or decline an invitation to a project
#[utoipa::path(
    post,
    path = "/api/projects/{id}/invitation",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    request_body = RespondInvitationDto,
    responses(
        (status = 200, description = "Invitation answered", body = ApiResponse<ContributorResponseDto>),
        (status = 404, description = "No pending invitation for the caller on this project")
    ),
    security(("bearer_auth" = [])),
    tag = "invitations"
)]
pub async fn respond_to_invitation(
    user: AuthenticatedUser,
    State(service): State<Arc<ContributorService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<RespondInvitationDto>,
) -> Result<Json<ApiResponse<ContributorResponseDto>>> {
    let contributor = service.respond(user.user_id, id, dto.decision).await?;
    Ok(Json(ApiResponse::success(
        Some(contributor.into()),
        None,
        None,
    )))
}

/// List the caller's unanswered invitations
#[utoipa::path(
    get,
    path = "/api/invitations",
    responses(
        (status = 200, description = "Pending invitations", body = ApiResponse<Vec<PendingInvitationDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "invitations"
)]
pub async fn list_pending_invitations(
    user: AuthenticatedUser,
    State(service): State<Arc<ContributorService>>,
) -> Result<Json<ApiResponse<Vec<PendingInvitationDto>>>> {
    let invitations: Vec<PendingInvitationDto> = service
        .pending_invitations(user.user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::total(invitations.len());

    Ok(Json(ApiResponse::success(Some(invitations), None, Some(meta))))
}

/// Link contributor rows for the caller's email to the caller's account
///
/// Called by the account service right after signup, with the new account's
/// token. Repeating the call changes nothing.
#[utoipa::path(
    post,
    path = "/api/invitations/reconcile",
    responses(
        (status = 200, description = "Rows linked by this call", body = ApiResponse<Vec<ContributorResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "invitations"
)]
pub async fn reconcile_signup(
    user: AuthenticatedUser,
    State(service): State<Arc<ContributorService>>,
) -> Result<Json<ApiResponse<Vec<ContributorResponseDto>>>> {
    let linked: Vec<ContributorResponseDto> = service
        .reconcile_signup(&user.email, user.user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::total(linked.len());

    Ok(Json(ApiResponse::success(Some(linked), None, Some(meta))))
}

#[cfg(test)]
mod tests {
    use crate::features::contributors::routes::routes;
    use crate::features::contributors::ContributorService;
    use crate::features::notifications::NotificationDispatcher;
    use crate::shared::test_helpers::{
        seed_project, test_user, with_user, InMemoryContributorRepository,
        InMemoryProjectRepository, InMemoryUserDirectory,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_referral_signs_up_then_answers_once() {
        let projects = Arc::new(InMemoryProjectRepository::default());
        let owner = test_user();
        let project = seed_project(&projects, &owner, "Harbour Depot");
        let (dispatcher, _outbox) = NotificationDispatcher::channel(16);
        let service = Arc::new(ContributorService::new(
            Arc::new(InMemoryContributorRepository::default()),
            projects,
            Arc::new(InMemoryUserDirectory::default()),
            dispatcher,
        ));

        let mut invitee = test_user();
        invitee.email = "foreman@harbour.test".to_string();
        let as_owner = TestServer::new(with_user(routes(service.clone()), owner)).unwrap();
        let as_invitee = TestServer::new(with_user(routes(service), invitee)).unwrap();

        as_owner
            .post(&format!("/api/projects/{}/contributors", project.id))
            .json(&json!({ "contributors": [{ "email": "Foreman@Harbour.test" }] }))
            .await
            .assert_status_ok();

        let linked: Value = as_invitee.post("/api/invitations/reconcile").await.json();
        assert_eq!(linked["meta"]["total"], 1);

        let pending: Value = as_invitee.get("/api/invitations").await.json();
        assert_eq!(pending["data"][0]["project_name"], "Harbour Depot");

        let path = format!("/api/projects/{}/invitation", project.id);
        let answered: Value = as_invitee
            .post(&path)
            .json(&json!({ "decision": "accepted" }))
            .await
            .json();
        assert_eq!(answered["data"]["invitation_state"], "accepted");

        as_invitee
            .post(&path)
            .json(&json!({ "decision": "declined" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
