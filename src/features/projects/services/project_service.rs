use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::AuthenticatedUser;
use crate::features::contributors::models::Contributor;
use crate::features::contributors::ContributorService;
use crate::features::projects::dtos::CreateProjectDto;
use crate::features::projects::models::{NewProject, Project};
use crate::features::projects::repositories::ProjectRepository;
use crate::features::weekly_goals::models::WeeklyGoal;
use crate::features::weekly_goals::services::{WeeklyGoalService, SEEDED_GOAL_COUNT};

/// Result of project creation
#[derive(Debug, Clone)]
pub struct CreatedProject {
    pub project: Project,
    pub contributors: Vec<Contributor>,
    pub goals: Vec<WeeklyGoal>,
}

pub struct ProjectService {
    repository: Arc<dyn ProjectRepository>,
    contributors: Arc<ContributorService>,
    goals: Arc<WeeklyGoalService>,
}

impl ProjectService {
    pub fn new(
        repository: Arc<dyn ProjectRepository>,
        contributors: Arc<ContributorService>,
        goals: Arc<WeeklyGoalService>,
    ) -> Self {
        Self {
            repository,
            contributors,
            goals,
        }
    }

    /// Creates the project owned by `owner`, invites the listed contributors
    /// and seeds goals for the period covering `reference` and the ones after.
    /// The contributor list is validated before anything is written.
    pub async fn create(
        &self,
        owner: &AuthenticatedUser,
        dto: CreateProjectDto,
        reference: DateTime<Utc>,
    ) -> Result<CreatedProject> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let name = dto.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Project name is required".to_string()));
        }

        let invites = if dto.contributors.is_empty() {
            Vec::new()
        } else {
            ContributorService::prepare_batch(dto.contributors)?
        };

        let project = self
            .repository
            .insert(&NewProject {
                name,
                description: dto
                    .description
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty()),
                created_by: owner.user_id,
            })
            .await?;

        tracing::info!(
            "Project created: id={}, name={}, owner={}",
            project.id,
            project.name,
            owner.user_id
        );

        // Goals first: a failed seed leaves no invitation mail behind
        let seeded = async {
            let goals = self
                .goals
                .seed_goals(project.id, reference, SEEDED_GOAL_COUNT)
                .await?;
            let contributors = if invites.is_empty() {
                Vec::new()
            } else {
                self.contributors.invite_prepared(&project, invites).await?
            };
            Ok::<_, AppError>((contributors, goals))
        }
        .await;

        match seeded {
            Ok((contributors, goals)) => Ok(CreatedProject {
                project,
                contributors,
                goals,
            }),
            Err(e) => {
                self.discard(&project).await;
                Err(e)
            }
        }
    }

    /// Removes a half-created project; its rows go with it through the
    /// foreign keys
    async fn discard(&self, project: &Project) {
        match self.repository.delete(project.id).await {
            Ok(_) => tracing::warn!(
                "Project creation rolled back: id={}, name={}",
                project.id,
                project.name
            ),
            Err(e) => tracing::error!(
                "Failed to roll back project {} after a failed create: {:?}",
                project.id,
                e
            ),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Project> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))
    }

    pub async fn list_owned(&self, owner: &AuthenticatedUser) -> Result<Vec<Project>> {
        self.repository.list_by_owner(owner.user_id).await
    }
}
