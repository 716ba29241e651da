use rust_decimal::Decimal;
use serde::Serialize;

use crate::features::daily_reports::models::DailyReportDetail;
use crate::shared::period::WeekPolicy;

/// One exported report, flattened into display cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportBlock {
    pub details: DetailsSection,
    pub progress: ProgressSection,
    pub labour: Vec<LabourRow>,
    pub materials: Vec<MaterialRow>,
    pub plant: Vec<PlantRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsSection {
    pub project_name: String,
    /// Local calendar day of `created_at` (YYYY-MM-DD)
    pub report_date: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSection {
    pub notes: String,
    pub delay_hours: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabourRow {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRow {
    pub material_type: String,
    pub quantity: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantRow {
    pub description: String,
    pub quantity: String,
}

/// Flattens resolved reports into blocks, keeping their order.
/// No reports yields no blocks.
pub fn build_blocks(
    project_name: &str,
    reports: &[DailyReportDetail],
    policy: &WeekPolicy,
) -> Vec<ReportBlock> {
    reports
        .iter()
        .map(|detail| ReportBlock {
            details: DetailsSection {
                project_name: project_name.to_string(),
                report_date: policy
                    .local_date(detail.report.created_at)
                    .format("%Y-%m-%d")
                    .to_string(),
                author: detail.report.author_name.clone(),
            },
            progress: ProgressSection {
                notes: detail.report.progress_notes.clone(),
                delay_hours: decimal_cell(detail.report.delay_hours),
            },
            labour: detail
                .labour
                .iter()
                .map(|entry| LabourRow {
                    name: entry.name.clone(),
                    role: entry.role.clone().unwrap_or_default(),
                })
                .collect(),
            materials: detail
                .materials
                .iter()
                .map(|entry| MaterialRow {
                    material_type: entry.material_type.clone(),
                    quantity: decimal_cell(entry.quantity),
                    unit: entry.unit.clone().unwrap_or_default(),
                })
                .collect(),
            plant: detail
                .plant
                .iter()
                .map(|entry| PlantRow {
                    description: entry.description.clone(),
                    quantity: decimal_cell(entry.quantity),
                })
                .collect(),
        })
        .collect()
}

fn decimal_cell(value: Option<Decimal>) -> String {
    value.map(|d| d.normalize().to_string()).unwrap_or_default()
}
