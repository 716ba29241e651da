//! Daily site reports.
//!
//! A report owns its labour, material and plant entries and at most one
//! weather record. Replacing contents rewrites all of them; deleting the
//! report deletes all of them.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/projects/{id}/reports` | File a report |
//! | GET | `/api/projects/{id}/reports` | Feed, newest first, optional `start`/`end` |
//! | GET | `/api/reports/{id}` | Get report |
//! | PUT | `/api/reports/{id}/contents` | Replace contents |
//! | PATCH | `/api/reports/{id}/status` | Set review status |
//! | DELETE | `/api/reports/{id}` | Delete report |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgDailyReportRepository;
pub use services::DailyReportService;
