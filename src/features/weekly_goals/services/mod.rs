mod weekly_goal_service;

pub use weekly_goal_service::{WeeklyGoalService, SEEDED_GOAL_COUNT};
