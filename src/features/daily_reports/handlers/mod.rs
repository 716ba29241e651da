mod daily_report_handler;

pub use daily_report_handler::*;
