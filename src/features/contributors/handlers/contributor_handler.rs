//! Project contributor handlers

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
    ContributorResponseDto, EditPermissionsDto, InviteContributorsDto, PermissionEditResultDto,
};
use crate::features::contributors::services::ContributorService;
use crate::shared::types::{ApiResponse, Meta};

/// Invite contributors to a project
///
/// The batch is all-or-nothing: if any email is already on the project (or
/// repeats in the batch) nothing is written and the conflicting emails are
/// returned in `errors`.
#[utoipa::path(
    post,
    path = "/api/projects/{id}/contributors",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    request_body = InviteContributorsDto,
    responses(
        (status = 200, description = "Contributors invited", body = ApiResponse<Vec<ContributorResponseDto>>),
        (status = 400, description = "Empty list or invalid email"),
        (status = 403, description = "Caller does not own the project"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Some contributors are already added to this project")
    ),
    security(("bearer_auth" = [])),
    tag = "contributors"
)]
pub async fn invite_contributors(
    user: AuthenticatedUser,
    State(service): State<Arc<ContributorService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<InviteContributorsDto>,
) -> Result<Json<ApiResponse<Vec<ContributorResponseDto>>>> {
    let created: Vec<ContributorResponseDto> = service
        .invite(&user, id, dto.contributors)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::total(created.len());

    Ok(Json(ApiResponse::success(
        Some(created),
        Some("Contributors invited".to_string()),
        Some(meta),
    )))
}

/// List contributors of a project
#[utoipa::path(
    get,
    path = "/api/projects/{id}/contributors",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project contributors", body = ApiResponse<Vec<ContributorResponseDto>>),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contributors"
)]
pub async fn list_contributors(
    State(service): State<Arc<ContributorService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ContributorResponseDto>>>> {
    let contributors: Vec<ContributorResponseDto> = service
        .list(id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::total(contributors.len());

    Ok(Json(ApiResponse::success(Some(contributors), None, Some(meta))))
}

/// Change contributor permissions by email
#[utoipa::path(
    patch,
    path = "/api/projects/{id}/contributors/permissions",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    request_body = EditPermissionsDto,
    responses(
        (status = 200, description = "Permissions updated", body = ApiResponse<PermissionEditResultDto>),
        (status = 400, description = "Empty edit list"),
        (status = 403, description = "Caller does not own the project"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "contributors"
)]
pub async fn edit_permissions(
    user: AuthenticatedUser,
    State(service): State<Arc<ContributorService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<EditPermissionsDto>,
) -> Result<Json<ApiResponse<PermissionEditResultDto>>> {
    let result = service.edit_permissions(&user, id, dto.edits).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}
