use serde::Serialize;

use super::ReportRenderer;
use crate::core::error::Result;
use crate::features::exports::models::ReportBlock;
use crate::shared::templates::render_template;

const TEMPLATE: &str = "exports/reports.html.jinja";

/// Printable document, one page per report; empty sub-tables are skipped
pub struct HtmlRenderer;

#[derive(Serialize)]
struct DocumentContext<'a> {
    title: &'a str,
    blocks: &'a [ReportBlock],
}

impl ReportRenderer for HtmlRenderer {
    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    fn render(&self, title: &str, blocks: &[ReportBlock]) -> Result<Vec<u8>> {
        let html = render_template(TEMPLATE, DocumentContext { title, blocks })?;
        Ok(html.into_bytes())
    }
}
