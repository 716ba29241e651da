//! Read-only view of the account directory.
//!
//! Accounts are created by the external account service and land in the shared
//! `users` table. The contributor registry only needs to ask whether an email
//! already has an account.

pub mod clients;

pub use clients::{DirectoryUser, PgUserDirectory, UserDirectory};
