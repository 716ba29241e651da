mod weekly_goal_repository;

pub use weekly_goal_repository::{PgWeeklyGoalRepository, WeeklyGoalRepository};
