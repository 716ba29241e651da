use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::error::{AppError, Result};
use crate::shared::period::Period;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl Meta {
    pub fn total(len: usize) -> Self {
        Self { total: len as i64 }
    }
}

// =============================================================================
// DATE RANGES
// =============================================================================

/// Inclusive calendar-day range used by period and export queries
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    /// First day (YYYY-MM-DD), inclusive
    pub start: NaiveDate,
    /// Last day (YYYY-MM-DD), inclusive
    pub end: NaiveDate,
}

/// Same as [`DateRangeQuery`] but both bounds may be omitted
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OptionalDateRangeQuery {
    /// First day (YYYY-MM-DD), inclusive
    pub start: Option<NaiveDate>,
    /// Last day (YYYY-MM-DD), inclusive
    pub end: Option<NaiveDate>,
}

impl DateRangeQuery {
    pub fn period(&self) -> Result<Period> {
        Period::checked(self.start, self.end, ("start", "end"))
    }
}

impl OptionalDateRangeQuery {
    /// `Ok(None)` when neither bound is given; both or neither are required
    pub fn period(&self) -> Result<Option<Period>> {
        match (self.start, self.end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => DateRangeQuery { start, end }.period().map(Some),
            _ => Err(AppError::Validation(
                "start and end must be provided together".to_string(),
            )),
        }
    }
}

/// Emails are compared and stored trimmed and lowercased
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}
