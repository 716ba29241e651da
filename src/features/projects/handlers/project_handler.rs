use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::AuthenticatedUser;
use crate::features::projects::dtos::{CreateProjectDto, ProjectCreatedDto, ProjectResponseDto};
use crate::features::projects::services::ProjectService;
use crate::shared::types::{ApiResponse, Meta};

/// Create a project
///
/// Contributors in the request are invited in the same call, and goals are
/// seeded for the current period and the three that follow.
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectDto,
    responses(
        (status = 200, description = "Project created", body = ApiResponse<ProjectCreatedDto>),
        (status = 400, description = "Missing name or invalid contributor email"),
        (status = 409, description = "An email appears twice in the contributor list")
    ),
    security(("bearer_auth" = [])),
    tag = "projects"
)]
pub async fn create_project(
    user: AuthenticatedUser,
    State(service): State<Arc<ProjectService>>,
    AppJson(dto): AppJson<CreateProjectDto>,
) -> Result<Json<ApiResponse<ProjectCreatedDto>>> {
    let created = service.create(&user, dto, Utc::now()).await?;

    Ok(Json(ApiResponse::success(
        Some(ProjectCreatedDto {
            project: created.project.into(),
            contributors: created.contributors.into_iter().map(Into::into).collect(),
            goals: created.goals.into_iter().map(Into::into).collect(),
        }),
        Some("Project created".to_string()),
        None,
    )))
}

/// List projects owned by the caller
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "Owned projects", body = ApiResponse<Vec<ProjectResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "projects"
)]
pub async fn list_projects(
    user: AuthenticatedUser,
    State(service): State<Arc<ProjectService>>,
) -> Result<Json<ApiResponse<Vec<ProjectResponseDto>>>> {
    let projects: Vec<ProjectResponseDto> = service
        .list_owned(&user)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::total(projects.len());

    Ok(Json(ApiResponse::success(Some(projects), None, Some(meta))))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project found", body = ApiResponse<ProjectResponseDto>),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "projects"
)]
pub async fn get_project(
    State(service): State<Arc<ProjectService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProjectResponseDto>>> {
    let project = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(project.into()), None, None)))
}
