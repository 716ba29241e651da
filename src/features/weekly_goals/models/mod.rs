mod weekly_goal;

pub use weekly_goal::{NewWeeklyGoal, WeeklyGoal};
