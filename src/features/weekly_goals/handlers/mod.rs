mod period_handler;
mod weekly_goal_handler;

pub use period_handler::*;
pub use weekly_goal_handler::*;
