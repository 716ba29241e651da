use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::contributors::dtos::{ContributorResponseDto, InviteContributorDto};
use crate::features::weekly_goals::dtos::WeeklyGoalResponseDto;

/// Request DTO for creating a project
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProjectDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Invited right after the project is created; may be empty
    #[serde(default)]
    pub contributors: Vec<InviteContributorDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A new project with its invited contributors and seeded goals
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectCreatedDto {
    pub project: ProjectResponseDto,
    pub contributors: Vec<ContributorResponseDto>,
    pub goals: Vec<WeeklyGoalResponseDto>,
}
