mod daily_report_repository;

pub use daily_report_repository::{DailyReportRepository, PgDailyReportRepository};
