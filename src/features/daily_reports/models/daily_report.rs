use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::site_records::{LabourEntry, MaterialEntry, PlantEntry, ReportContents, Weather};

/// Review outcome of a daily report (stored as 0/1/2 in older exports)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "review_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Unreviewed,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn code(self) -> u8 {
        match self {
            ReviewStatus::Unreviewed => 0,
            ReviewStatus::Approved => 1,
            ReviewStatus::Rejected => 2,
        }
    }
}

/// Database model for daily report (without owned sub-records)
#[derive(Debug, Clone, FromRow)]
pub struct DailyReport {
    pub id: Uuid,
    pub project_id: Uuid,
    pub progress_notes: String,
    pub delay_hours: Option<Decimal>,
    pub weather_id: Option<Uuid>,
    pub photo_urls: Vec<String>,
    pub status: ReviewStatus,
    pub created_by: Uuid,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A report with its labour, material, plant and weather records resolved
#[derive(Debug, Clone)]
pub struct DailyReportDetail {
    pub report: DailyReport,
    pub labour: Vec<LabourEntry>,
    pub materials: Vec<MaterialEntry>,
    pub plant: Vec<PlantEntry>,
    pub weather: Option<Weather>,
}

/// Data for creating a new report
#[derive(Debug, Clone)]
pub struct NewDailyReport {
    pub project_id: Uuid,
    pub created_by: Uuid,
    pub author_name: String,
    /// Bucketing anchor, taken from the request clock
    pub created_at: DateTime<Utc>,
    pub contents: ReportContents,
}

/// Sort order by `created_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOrder {
    OldestFirst,
    NewestFirst,
}
