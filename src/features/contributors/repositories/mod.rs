mod contributor_repository;

pub use contributor_repository::{ContributorRepository, PgContributorRepository};
