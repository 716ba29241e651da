use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::daily_reports::models::{
    DailyReportDetail, LabourEntry, MaterialEntry, PlantEntry, ReportContents, ReviewStatus,
    Weather,
};

/// Request DTO for creating a report or replacing its contents
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportContentsDto {
    #[serde(default)]
    pub progress_notes: String,

    /// Hours lost on site, accepts a number or a decimal string
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "1.5")]
    pub delay_hours: Option<Decimal>,

    /// Opaque URLs from the blob store, kept in order
    #[serde(default)]
    pub photo_urls: Vec<String>,

    #[serde(default)]
    pub labour: Vec<LabourEntry>,
    #[serde(default)]
    pub materials: Vec<MaterialEntry>,
    #[serde(default)]
    pub plant: Vec<PlantEntry>,
    #[serde(default)]
    pub weather: Option<Weather>,
}

impl From<ReportContentsDto> for ReportContents {
    fn from(dto: ReportContentsDto) -> Self {
        Self {
            progress_notes: dto.progress_notes.trim().to_string(),
            delay_hours: dto.delay_hours,
            photo_urls: dto.photo_urls,
            labour: dto.labour,
            materials: dto.materials,
            plant: dto.plant,
            weather: dto.weather,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReviewStatus,
}

/// Response DTO for a daily report with its site records
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyReportResponseDto {
    pub id: Uuid,
    pub project_id: Uuid,
    pub progress_notes: String,
    #[schema(value_type = Option<String>)]
    pub delay_hours: Option<Decimal>,
    pub photo_urls: Vec<String>,
    pub status: ReviewStatus,
    pub created_by: Uuid,
    pub author_name: String,
    pub labour: Vec<LabourEntry>,
    pub materials: Vec<MaterialEntry>,
    pub plant: Vec<PlantEntry>,
    pub weather: Option<Weather>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DailyReportDetail> for DailyReportResponseDto {
    fn from(detail: DailyReportDetail) -> Self {
        let report = detail.report;
        Self {
            id: report.id,
            project_id: report.project_id,
            progress_notes: report.progress_notes,
            delay_hours: report.delay_hours,
            photo_urls: report.photo_urls,
            status: report.status,
            created_by: report.created_by,
            author_name: report.author_name,
            labour: detail.labour,
            materials: detail.materials,
            plant: detail.plant,
            weather: detail.weather,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}
