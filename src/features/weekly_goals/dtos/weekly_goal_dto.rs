use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::daily_reports::dtos::DailyReportResponseDto;
use crate::features::weekly_goals::models::WeeklyGoal;

/// One goal in a batch create; every field is required
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateWeeklyGoalDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// First day of the period (inclusive)
    pub period_start: NaiveDate,

    /// Last day of the period (inclusive)
    pub period_end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateWeeklyGoalsDto {
    pub goals: Vec<CreateWeeklyGoalDto>,
}

/// Title and description for an upsert on a period
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertWeeklyGoalDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update; omitted fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateWeeklyGoalDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeeklyGoalResponseDto {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A goal with the reports filed during its period, oldest first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GoalReportsDto {
    pub goal: WeeklyGoalResponseDto,
    pub reports: Vec<DailyReportResponseDto>,
}

/// The period covering the request time
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentPeriodDto {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// 00:00:00.000 of `period_start`
    pub starts_at: DateTime<Utc>,
    /// 23:59:59.999 of `period_end`
    pub ends_at: DateTime<Utc>,
    pub week_start: String,
    pub window_days: u32,
}

impl From<WeeklyGoal> for WeeklyGoalResponseDto {
    fn from(g: WeeklyGoal) -> Self {
        Self {
            id: g.id,
            project_id: g.project_id,
            title: g.title,
            description: g.description,
            period_start: g.period_start,
            period_end: g.period_end,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}
