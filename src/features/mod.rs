pub mod auth;
pub mod contributors;
pub mod daily_reports;
pub mod exports;
pub mod notifications;
pub mod projects;
pub mod users;
pub mod weekly_goals;
