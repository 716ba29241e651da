use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::daily_reports::models::DailyReportDetail;
use crate::features::exports::models::build_blocks;
use crate::features::exports::renderers::ExportFormat;
use crate::features::projects::models::Project;
use crate::features::projects::repositories::ProjectRepository;
use crate::features::weekly_goals::services::WeeklyGoalService;
use crate::shared::period::Period;

/// Rendered export ready to be sent as a download
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub struct ExportService {
    goals: Arc<WeeklyGoalService>,
    projects: Arc<dyn ProjectRepository>,
}

impl ExportService {
    pub fn new(goals: Arc<WeeklyGoalService>, projects: Arc<dyn ProjectRepository>) -> Self {
        Self { goals, projects }
    }

    /// Reports filed during the goal's period, oldest first
    pub async fn export_goal(&self, goal_id: Uuid, format: ExportFormat) -> Result<ExportFile> {
        let (goal, reports) = self.goals.reports_for_goal(goal_id).await?;
        let project = self.project(goal.project_id).await?;
        self.assemble(&project, goal.period(), &reports, format)
    }

    pub async fn export_range(
        &self,
        project_id: Uuid,
        period: Period,
        format: ExportFormat,
    ) -> Result<ExportFile> {
        let project = self.project(project_id).await?;
        let reports = self.goals.reports_in_range(project_id, period).await?;
        self.assemble(&project, period, &reports, format)
    }

    async fn project(&self, project_id: Uuid) -> Result<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))
    }

    fn assemble(
        &self,
        project: &Project,
        period: Period,
        reports: &[DailyReportDetail],
        format: ExportFormat,
    ) -> Result<ExportFile> {
        let blocks = build_blocks(&project.name, reports, self.goals.policy());
        if blocks.is_empty() {
            return Err(AppError::NotFound(format!(
                "No reports to export between {} and {}",
                period.start, period.end
            )));
        }

        let renderer = format.renderer();
        let title = format!(
            "{} daily reports, {} to {}",
            project.name, period.start, period.end
        );
        let bytes = renderer.render(&title, &blocks)?;

        tracing::info!(
            "Exported {} reports: project={}, period={}..{}, format={:?}",
            blocks.len(),
            project.id,
            period.start,
            period.end,
            format
        );

        Ok(ExportFile {
            file_name: format!(
                "{}-{}-{}.{}",
                slug(&project.name),
                period.start,
                period.end,
                renderer.extension()
            ),
            content_type: renderer.content_type(),
            bytes,
        })
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes
fn slug(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "project".to_string()
    } else {
        slug
    }
}
