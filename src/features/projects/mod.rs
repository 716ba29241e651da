//! Projects.
//!
//! A project is created by its owner together with its first contributors;
//! four weekly goals are seeded starting with the current period.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/projects` | Create, invite contributors, seed goals |
//! | GET | `/api/projects` | Projects owned by the caller |
//! | GET | `/api/projects/{id}` | Get project |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgProjectRepository;
pub use services::ProjectService;
