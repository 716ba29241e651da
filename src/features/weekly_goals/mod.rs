//! Weekly goals and period-bucketed report queries.
//!
//! Every period used here comes from the configured
//! [`WeekPolicy`](crate::shared::period::WeekPolicy). A goal is keyed by its
//! exact `(period_start, period_end)`; reports belong to a period when their
//! `created_at` falls between 00:00:00.000 of the first day and 23:59:59.999 of
//! the last.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/periods/current` | Period covering now |
//! | GET, POST | `/api/projects/{id}/goals` | List / batch create |
//! | GET, PUT | `/api/projects/{id}/goals/current` | Current goal / upsert |
//! | GET, PUT | `/api/projects/{id}/goals/period?start&end` | Goal for period / upsert |
//! | GET | `/api/projects/{id}/goals/past` | Goals before the current period |
//! | GET | `/api/projects/{id}/reports/range?start&end` | Reports, oldest first |
//! | GET, PATCH, DELETE | `/api/goals/{id}` | Get / edit / delete |
//! | GET | `/api/goals/{id}/reports` | Goal with its reports |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgWeeklyGoalRepository;
pub use services::WeeklyGoalService;
