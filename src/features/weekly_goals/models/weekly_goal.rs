use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::shared::period::Period;

/// Database model for weekly goal
#[derive(Debug, Clone, FromRow)]
pub struct WeeklyGoal {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WeeklyGoal {
    pub fn period(&self) -> Period {
        Period {
            start: self.period_start,
            end: self.period_end,
        }
    }
}

/// Data for creating (or upserting) a goal
#[derive(Debug, Clone)]
pub struct NewWeeklyGoal {
    pub title: String,
    pub description: Option<String>,
    pub period: Period,
}
