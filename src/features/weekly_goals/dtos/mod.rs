mod weekly_goal_dto;

pub use weekly_goal_dto::{
    CreateWeeklyGoalDto, CreateWeeklyGoalsDto, CurrentPeriodDto, GoalReportsDto,
    UpdateWeeklyGoalDto, UpsertWeeklyGoalDto, WeeklyGoalResponseDto,
};
