use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::AuthenticatedUser;
use crate::features::daily_reports::dtos::{
    DailyReportResponseDto, ReportContentsDto, UpdateReportStatusDto,
};
use crate::features::daily_reports::services::DailyReportService;
use crate::shared::types::{ApiResponse, Meta, OptionalDateRangeQuery};

/// File a daily report for a project
#[utoipa::path(
    post,
    path = "/api/projects/{id}/reports",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    request_body = ReportContentsDto,
    responses(
        (status = 200, description = "Report created", body = ApiResponse<DailyReportResponseDto>),
        (status = 400, description = "Invalid report contents"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "daily-reports"
)]
pub async fn create_report(
    user: AuthenticatedUser,
    State(service): State<Arc<DailyReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ReportContentsDto>,
) -> Result<Json<ApiResponse<DailyReportResponseDto>>> {
    let report = service.create(id, &user, dto.into(), Utc::now()).await?;
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Daily report created".to_string()),
        None,
    )))
}

/// Project report feed, newest first
///
/// With `start` and `end` only reports created within those days are returned.
#[utoipa::path(
    get,
    path = "/api/projects/{id}/reports",
    params(
        ("id" = Uuid, Path, description = "Project ID"),
        OptionalDateRangeQuery
    ),
    responses(
        (status = 200, description = "Reports, newest first", body = ApiResponse<Vec<DailyReportResponseDto>>),
        (status = 400, description = "Only one bound given or start after end"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = [])),
    tag = "daily-reports"
)]
pub async fn list_project_reports(
    State(service): State<Arc<DailyReportService>>,
    Path(id): Path<Uuid>,
    AppQuery(range): AppQuery<OptionalDateRangeQuery>,
) -> Result<Json<ApiResponse<Vec<DailyReportResponseDto>>>> {
    let reports = match range.period()? {
        Some(period) => service.feed_in_range(id, period).await?,
        None => service.feed(id).await?,
    };
    let reports: Vec<DailyReportResponseDto> = reports.into_iter().map(Into::into).collect();
    let meta = Meta::total(reports.len());

    Ok(Json(ApiResponse::success(Some(reports), None, Some(meta))))
}

/// Get a daily report with its site records
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<DailyReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "daily-reports"
)]
pub async fn get_report(
    State(service): State<Arc<DailyReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DailyReportResponseDto>>> {
    let report = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Replace everything a report records
#[utoipa::path(
    put,
    path = "/api/reports/{id}/contents",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = ReportContentsDto,
    responses(
        (status = 200, description = "Contents replaced", body = ApiResponse<DailyReportResponseDto>),
        (status = 400, description = "Invalid report contents"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "daily-reports"
)]
pub async fn replace_report_contents(
    State(service): State<Arc<DailyReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ReportContentsDto>,
) -> Result<Json<ApiResponse<DailyReportResponseDto>>> {
    let report = service.replace_contents(id, dto.into()).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Set the review status of a report
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<DailyReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "daily-reports"
)]
pub async fn update_report_status(
    State(service): State<Arc<DailyReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<DailyReportResponseDto>>> {
    let report = service.set_status(id, dto.status).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Delete a report and its site records
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "daily-reports"
)]
pub async fn delete_report(
    State(service): State<Arc<DailyReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Daily report deleted".to_string()),
        None,
    )))
}
