mod contributor_service;

pub use contributor_service::ContributorService;
