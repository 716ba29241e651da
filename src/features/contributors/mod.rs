//! Project contributors and the invitation lifecycle.
//!
//! A contributor is an email invited to a project. When no account exists for
//! the email at invite time the row is a *referral*: an invitation mail is
//! queued, and the row is linked to the account once it signs up
//! (`POST /api/invitations/reconcile`). Only referral rows go through the
//! accept/decline step.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/projects/{id}/contributors` | Owner | Invite a batch of emails |
//! | GET | `/api/projects/{id}/contributors` | Yes | List contributors |
//! | PATCH | `/api/projects/{id}/contributors/permissions` | Owner | Edit permissions |
//! | POST | `/api/projects/{id}/invitation` | Yes | Accept or decline |
//! | GET | `/api/invitations` | Yes | Caller's pending invitations |
//! | POST | `/api/invitations/reconcile` | Yes | Link rows after signup |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgContributorRepository;
pub use services::ContributorService;
