mod daily_report;
mod site_records;

pub use daily_report::{DailyReport, DailyReportDetail, NewDailyReport, ReportOrder, ReviewStatus};
pub use site_records::{LabourEntry, MaterialEntry, PlantEntry, ReportContents, Weather};
