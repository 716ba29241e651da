mod csv_renderer;
mod html_renderer;

pub use csv_renderer::CsvRenderer;
pub use html_renderer::HtmlRenderer;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::Result;
use crate::features::exports::models::ReportBlock;

/// Turns report blocks into a downloadable document
pub trait ReportRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn extension(&self) -> &'static str;

    fn render(&self, title: &str, blocks: &[ReportBlock]) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Spreadsheet-friendly, every sub-table keeps its header row
    #[default]
    Csv,
    /// Printable document, empty sub-tables are left out
    Html,
}

impl ExportFormat {
    pub fn renderer(self) -> Box<dyn ReportRenderer> {
        match self {
            ExportFormat::Csv => Box::new(CsvRenderer),
            ExportFormat::Html => Box::new(HtmlRenderer),
        }
    }
}
