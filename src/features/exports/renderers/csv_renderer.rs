use csv::WriterBuilder;

use super::ReportRenderer;
use crate::core::error::{AppError, Result};
use crate::features::exports::models::ReportBlock;

/// Tabular export. Each block is a run of labelled sub-tables; header rows are
/// written even when a sub-table has no rows.
pub struct CsvRenderer;

impl ReportRenderer for CsvRenderer {
    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, title: &str, blocks: &[ReportBlock]) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        if !blocks.is_empty() {
            write_row(&mut writer, &[title])?;
        }

        for (index, block) in blocks.iter().enumerate() {
            let number = (index + 1).to_string();
            write_row(&mut writer, &["Report", number.as_str()])?;

            write_row(&mut writer, &["Project", "Date", "Author"])?;
            write_row(
                &mut writer,
                &[
                    block.details.project_name.as_str(),
                    block.details.report_date.as_str(),
                    block.details.author.as_str(),
                ],
            )?;

            write_row(&mut writer, &["Progress", "Delay hours"])?;
            write_row(
                &mut writer,
                &[
                    block.progress.notes.as_str(),
                    block.progress.delay_hours.as_str(),
                ],
            )?;

            write_row(&mut writer, &["Labour", "Role"])?;
            for row in &block.labour {
                write_row(&mut writer, &[row.name.as_str(), row.role.as_str()])?;
            }

            write_row(&mut writer, &["Material", "Quantity", "Unit"])?;
            for row in &block.materials {
                write_row(
                    &mut writer,
                    &[
                        row.material_type.as_str(),
                        row.quantity.as_str(),
                        row.unit.as_str(),
                    ],
                )?;
            }

            write_row(&mut writer, &["Plant", "Quantity"])?;
            for row in &block.plant {
                write_row(&mut writer, &[row.description.as_str(), row.quantity.as_str()])?;
            }
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to finish CSV export: {}", e)))
    }
}

fn write_row(writer: &mut csv::Writer<Vec<u8>>, cells: &[&str]) -> Result<()> {
    writer
        .write_record(cells)
        .map_err(|e| AppError::Internal(format!("Failed to write CSV row: {}", e)))
}
