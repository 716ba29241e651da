use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;

use crate::core::error::Result;
use crate::features::weekly_goals::dtos::CurrentPeriodDto;
use crate::features::weekly_goals::services::WeeklyGoalService;
use crate::shared::types::ApiResponse;

/// The reporting period covering now
#[utoipa::path(
    get,
    path = "/api/periods/current",
    responses(
        (status = 200, description = "Current period", body = ApiResponse<CurrentPeriodDto>)
    ),
    security(("bearer_auth" = [])),
    tag = "periods"
)]
pub async fn get_current_period(
    State(service): State<Arc<WeeklyGoalService>>,
) -> Result<Json<ApiResponse<CurrentPeriodDto>>> {
    let policy = service.policy();
    let period = service.current_period(Utc::now())?;
    let (starts_at, ends_at) = policy.period_bounds(&period)?;

    Ok(Json(ApiResponse::success(
        Some(CurrentPeriodDto {
            period_start: period.start,
            period_end: period.end,
            starts_at,
            ends_at,
            week_start: policy.week_start().to_string(),
            window_days: policy.window_days(),
        }),
        None,
        None,
    )))
}
