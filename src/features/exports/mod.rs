//! Report export.
//!
//! Reports are flattened into [`ReportBlock`](models::ReportBlock)s and handed
//! to a [`ReportRenderer`](renderers::ReportRenderer). CSV keeps every
//! sub-table header; the HTML print document leaves empty sub-tables out.
//! A request that matches no reports answers 404.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/goals/{id}/export?format=csv\|html` | Reports of the goal's period |
//! | GET | `/api/projects/{id}/reports/export?start&end&format` | Reports of a day range |

pub mod handlers;
pub mod models;
pub mod renderers;
pub mod routes;
pub mod services;

pub use services::ExportService;
