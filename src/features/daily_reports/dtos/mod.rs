mod daily_report_dto;

pub use daily_report_dto::{DailyReportResponseDto, ReportContentsDto, UpdateReportStatusDto};
