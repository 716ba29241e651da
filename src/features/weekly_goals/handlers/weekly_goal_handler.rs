use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::daily_reports::dtos::DailyReportResponseDto;
use crate::features::weekly_goals::dtos::{
    CreateWeeklyGoalsDto, GoalReportsDto, UpdateWeeklyGoalDto, UpsertWeeklyGoalDto,
    WeeklyGoalResponseDto,
};
use crate::features::weekly_goals::models::WeeklyGoal;
use crate::features::weekly_goals::services::WeeklyGoalService;
use crate::shared::types::{ApiResponse, DateRangeQuery, Meta};

fn goal_list(goals: Vec<WeeklyGoal>) -> Json<ApiResponse<Vec<WeeklyGoalResponseDto>>> {
    let goals: Vec<WeeklyGoalResponseDto> = goals.into_iter().map(Into::into).collect();
    let meta = Meta::total(goals.len());
    Json(ApiResponse::success(Some(goals), None, Some(meta)))
}

fn goal(goal: WeeklyGoal) -> Json<ApiResponse<WeeklyGoalResponseDto>> {
    Json(ApiResponse::success(Some(goal.into()), None, None))
}

/// List goals of a project, ascending by period
#[utoipa::path(
    get,
    path = "/api/projects/{id}/goals",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project goals", body = ApiResponse<Vec<WeeklyGoalResponseDto>>),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "weekly-goals"
)]
pub async fn list_goals(
    State(service): State<Arc<WeeklyGoalService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<WeeklyGoalResponseDto>>>> {
    Ok(goal_list(service.list(id).await?))
}

/// Create several goals at once
#[utoipa::path(
    post,
    path = "/api/projects/{id}/goals",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    request_body = CreateWeeklyGoalsDto,
    responses(
        (status = 200, description = "Goals created", body = ApiResponse<Vec<WeeklyGoalResponseDto>>),
        (status = 400, description = "Missing field or start after end"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "A goal already exists for one of the periods")
    ),
    security(("bearer_auth" = [])),
    tag = "weekly-goals"
)]
pub async fn create_goals(
    State(service): State<Arc<WeeklyGoalService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateWeeklyGoalsDto>,
) -> Result<Json<ApiResponse<Vec<WeeklyGoalResponseDto>>>> {
    Ok(goal_list(service.create_goals(id, dto.goals).await?))
}

/// Goal of the current period
#[utoipa::path(
    get,
    path = "/api/projects/{id}/goals/current",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Current goal", body = ApiResponse<WeeklyGoalResponseDto>),
        (status = 404, description = "No goal for the current period")
    ),
    security(("bearer_auth" = [])),
    tag = "weekly-goals"
)]
pub async fn get_current_goal(
    State(service): State<Arc<WeeklyGoalService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WeeklyGoalResponseDto>>> {
    Ok(goal(service.current_goal(id, Utc::now()).await?))
}

/// Create or overwrite the goal of the current period
#[utoipa::path(
    put,
    path = "/api/projects/{id}/goals/current",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    request_body = UpsertWeeklyGoalDto,
    responses(
        (status = 200, description = "Goal saved", body = ApiResponse<WeeklyGoalResponseDto>),
        (status = 400, description = "Missing title"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "weekly-goals"
)]
pub async fn upsert_current_goal(
    State(service): State<Arc<WeeklyGoalService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpsertWeeklyGoalDto>,
) -> Result<Json<ApiResponse<WeeklyGoalResponseDto>>> {
    Ok(goal(service.upsert_current_goal(id, Utc::now(), dto).await?))
}

/// Goal with exactly the given period bounds
#[utoipa::path(
    get,
    path = "/api/projects/{id}/goals/period",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        DateRangeQuery
    ),
    responses(
        (status = 200, description = "Goal found", body = ApiResponse<WeeklyGoalResponseDto>),
        (status = 400, description = "Invalid range"),
        (status = 404, description = "No goal for this period")
    ),
    security(("bearer_auth" = [])),
    tag = "weekly-goals"
)]
pub async fn get_goal_for_period(
    State(service): State<Arc<WeeklyGoalService>>,
    Path(id): Path<Uuid>,
    AppQuery(range): AppQuery<DateRangeQuery>,
) -> Result<Json<ApiResponse<WeeklyGoalResponseDto>>> {
    Ok(goal(service.goal_for_period(id, range.period()?).await?))
}

/// Create or overwrite the goal with exactly the given period bounds
#[utoipa::path(
    put,
    path = "/api/projects/{id}/goals/period",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        DateRangeQuery
    ),
    request_body = UpsertWeeklyGoalDto,
    responses(
        (status = 200, description = "Goal saved", body = ApiResponse<WeeklyGoalResponseDto>),
        (status = 400, description = "Invalid range or missing title"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "weekly-goals"
)]
pub async fn upsert_goal_for_period(
    State(service): State<Arc<WeeklyGoalService>>,
    Path(id): Path<Uuid>,
    AppQuery(range): AppQuery<DateRangeQuery>,
    AppJson(dto): AppJson<UpsertWeeklyGoalDto>,
) -> Result<Json<ApiResponse<WeeklyGoalResponseDto>>> {
    let period = range.period()?;
    Ok(goal(service.upsert_goal_for_period(id, period, dto).await?))
}

/// Goals that started before the current period, most recent first
#[utoipa::path(
    get,
    path = "/api/projects/{id}/goals/past",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Past goals", body = ApiResponse<Vec<WeeklyGoalResponseDto>>),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "weekly-goals"
)]
pub async fn list_past_goals(
    State(service): State<Arc<WeeklyGoalService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<WeeklyGoalResponseDto>>>> {
    Ok(goal_list(service.past_goals(id, Utc::now()).await?))
}

/// Reports created within a day range, oldest first
#[utoipa::path(
    get,
    path = "/api/projects/{id}/reports/range",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        DateRangeQuery
    ),
    responses(
        (status = 200, description = "Reports, oldest first", body = ApiResponse<Vec<DailyReportResponseDto>>),
        (status = 400, description = "Invalid range"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "weekly-goals"
)]
pub async fn list_reports_in_range(
    State(service): State<Arc<WeeklyGoalService>>,
    Path(id): Path<Uuid>,
    AppQuery(range): AppQuery<DateRangeQuery>,
) -> Result<Json<ApiResponse<Vec<DailyReportResponseDto>>>> {
    let reports: Vec<DailyReportResponseDto> = service
        .reports_in_range(id, range.period()?)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let meta = Meta::total(reports.len());

    Ok(Json(ApiResponse::success(Some(reports), None, Some(meta))))
}

/// Get a goal by ID
#[utoipa::path(
    get,
    path = "/api/goals/{id}",
    params(
        ("id" = Uuid, Path, description = "Goal ID")
    ),
    responses(
        (status = 200, description = "Goal found", body = ApiResponse<WeeklyGoalResponseDto>),
        (status = 404, description = "Goal not found")
    ),
    security(("bearer_auth" = [])),
    tag = "weekly-goals"
)]
pub async fn get_goal(
    State(service): State<Arc<WeeklyGoalService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WeeklyGoalResponseDto>>> {
    Ok(goal(service.get(id).await?))
}

/// Edit title, description or dates of a goal
#[utoipa::path(
    patch,
    path = "/api/goals/{id}",
    params(
        ("id" = Uuid, Path, description = "Goal ID")
    ),
    request_body = UpdateWeeklyGoalDto,
    responses(
        (status = 200, description = "Goal updated", body = ApiResponse<WeeklyGoalResponseDto>),
        (status = 400, description = "Invalid fields"),
        (status = 404, description = "Goal not found"),
        (status = 409, description = "Another goal already has these dates")
    ),
    security(("bearer_auth" = [])),
    tag = "weekly-goals"
)]
pub async fn update_goal(
    State(service): State<Arc<WeeklyGoalService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateWeeklyGoalDto>,
) -> Result<Json<ApiResponse<WeeklyGoalResponseDto>>> {
    Ok(goal(service.update(id, dto).await?))
}

/// Delete a goal
#[utoipa::path(
    delete,
    path = "/api/goals/{id}",
    params(
        ("id" = Uuid, Path, description = "Goal ID")
    ),
    responses(
        (status = 200, description = "Goal deleted"),
        (status = 404, description = "Goal not found")
    ),
    security(("bearer_auth" = [])),
    tag = "weekly-goals"
)]
pub async fn delete_goal(
    State(service): State<Arc<WeeklyGoalService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Weekly goal deleted".to_string()),
        None,
    )))
}

/// A goal with the reports filed during its period
#[utoipa::path(
    get,
    path = "/api/goals/{id}/reports",
    params(
        ("id" = Uuid, Path, description = "Goal ID")
    ),
    responses(
        (status = 200, description = "Goal and its reports", body = ApiResponse<GoalReportsDto>),
        (status = 404, description = "Goal not found")
    ),
    security(("bearer_auth" = [])),
    tag = "weekly-goals"
)]
pub async fn get_goal_reports(
    State(service): State<Arc<WeeklyGoalService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<GoalReportsDto>>> {
    let (goal, reports) = service.reports_for_goal(id).await?;
    let meta = Meta::total(reports.len());

    Ok(Json(ApiResponse::success(
        Some(GoalReportsDto {
            goal: goal.into(),
            reports: reports.into_iter().map(Into::into).collect(),
        }),
        None,
        Some(meta),
    )))
}
