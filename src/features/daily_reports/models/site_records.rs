use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Crew on site: trade or name, role, headcount/hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LabourEntry {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub quantity: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaterialEntry {
    pub material_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Machinery and equipment on site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PlantEntry {
    pub description: String,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub quantity: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Weather {
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub temperature: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub humidity: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub wind_speed: Option<Decimal>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Everything a report owns. Writing contents always replaces the previous
/// set as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportContents {
    pub progress_notes: String,
    pub delay_hours: Option<Decimal>,
    pub photo_urls: Vec<String>,
    pub labour: Vec<LabourEntry>,
    pub materials: Vec<MaterialEntry>,
    pub plant: Vec<PlantEntry>,
    pub weather: Option<Weather>,
}
