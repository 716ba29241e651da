mod daily_report_service;

pub use daily_report_service::DailyReportService;
