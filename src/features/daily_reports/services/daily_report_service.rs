use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::AuthenticatedUser;
use crate::features::daily_reports::models::{
    DailyReportDetail, NewDailyReport, ReportContents, ReportOrder, ReviewStatus,
};
use crate::features::daily_reports::repositories::DailyReportRepository;
use crate::features::projects::repositories::ProjectRepository;
use crate::shared::period::{Period, WeekPolicy};

/// Daily site reports and the project feed
pub struct DailyReportService {
    repository: Arc<dyn DailyReportRepository>,
    projects: Arc<dyn ProjectRepository>,
    policy: WeekPolicy,
}

impl DailyReportService {
    pub fn new(
        repository: Arc<dyn DailyReportRepository>,
        projects: Arc<dyn ProjectRepository>,
        policy: WeekPolicy,
    ) -> Self {
        Self {
            repository,
            projects,
            policy,
        }
    }

    /// File a report for `project_id`; `reference` becomes its `created_at`
    pub async fn create(
        &self,
        project_id: Uuid,
        author: &AuthenticatedUser,
        contents: ReportContents,
        reference: DateTime<Utc>,
    ) -> Result<DailyReportDetail> {
        validate_contents(&contents)?;
        self.ensure_project(project_id).await?;

        let detail = self
            .repository
            .insert(&NewDailyReport {
                project_id,
                created_by: author.user_id,
                author_name: author.display_name(),
                created_at: reference,
                contents,
            })
            .await?;

        tracing::info!(
            "Daily report created: id={}, project={}",
            detail.report.id,
            project_id
        );

        Ok(detail)
    }

    pub async fn get(&self, id: Uuid) -> Result<DailyReportDetail> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| report_not_found(id))
    }

    /// Full replace of notes, photos and every owned sub-record
    pub async fn replace_contents(
        &self,
        id: Uuid,
        contents: ReportContents,
    ) -> Result<DailyReportDetail> {
        validate_contents(&contents)?;
        self.repository
            .replace_contents(id, &contents)
            .await?
            .ok_or_else(|| report_not_found(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(report_not_found(id));
        }
        tracing::info!("Daily report deleted: id={}", id);
        Ok(())
    }

    pub async fn set_status(&self, id: Uuid, status: ReviewStatus) -> Result<DailyReportDetail> {
        self.repository
            .set_status(id, status)
            .await?
            .ok_or_else(|| report_not_found(id))?;
        self.get(id).await
    }

    /// Every report of the project, newest first
    pub async fn feed(&self, project_id: Uuid) -> Result<Vec<DailyReportDetail>> {
        self.ensure_project(project_id).await?;
        self.repository
            .list_by_project(project_id, None, ReportOrder::NewestFirst)
            .await
    }

    /// Reports created within the inclusive day range, newest first
    pub async fn feed_in_range(
        &self,
        project_id: Uuid,
        period: Period,
    ) -> Result<Vec<DailyReportDetail>> {
        self.ensure_project(project_id).await?;
        let bounds = self.policy.period_bounds(&period)?;
        self.repository
            .list_by_project(
                project_id,
                Some(bounds),
                ReportOrder::NewestFirst,
            )
            .await
    }

    async fn ensure_project(&self, project_id: Uuid) -> Result<()> {
        match self.projects.find_by_id(project_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!(
                "Project {} not found",
                project_id
            ))),
        }
    }
}

fn report_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Daily report {} not found", id))
}

fn validate_contents(contents: &ReportContents) -> Result<()> {
    if contents.delay_hours.is_some_and(|h| h < Decimal::ZERO) {
        return Err(AppError::Validation(
            "delay_hours must not be negative".to_string(),
        ));
    }
    if contents.labour.iter().any(|l| l.name.trim().is_empty()) {
        return Err(AppError::Validation(
            "Every labour entry needs a name".to_string(),
        ));
    }
    if contents
        .materials
        .iter()
        .any(|m| m.material_type.trim().is_empty())
    {
        return Err(AppError::Validation(
            "Every material entry needs a material_type".to_string(),
        ));
    }
    if contents.plant.iter().any(|p| p.description.trim().is_empty()) {
        return Err(AppError::Validation(
            "Every plant entry needs a description".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::daily_reports::models::{LabourEntry, PlantEntry, Weather};
    use crate::shared::test_helpers::{
        at, date, seed_project, test_user, InMemoryDailyReportRepository,
        InMemoryProjectRepository,
    };

    struct Fixture {
        service: DailyReportService,
        repository: Arc<InMemoryDailyReportRepository>,
        projects: Arc<InMemoryProjectRepository>,
    }

    fn fixture() -> Fixture {
        let repository = Arc::new(InMemoryDailyReportRepository::default());
        let projects = Arc::new(InMemoryProjectRepository::default());
        Fixture {
            service: DailyReportService::new(
                repository.clone(),
                projects.clone(),
                WeekPolicy::default(),
            ),
            repository,
            projects,
        }
    }

    fn contents(notes: &str) -> ReportContents {
        ReportContents {
            progress_notes: notes.to_string(),
            delay_hours: Some(Decimal::new(5, 1)),
            photo_urls: vec!["https://blob/1.jpg".to_string()],
            labour: vec![LabourEntry {
                name: "Carpenters".to_string(),
                role: Some("Formwork".to_string()),
                quantity: Some(Decimal::from(4)),
            }],
            plant: vec![PlantEntry {
                description: "Tower crane".to_string(),
                quantity: Some(Decimal::ONE),
            }],
            weather: Some(Weather {
                condition: Some("Sunny".to_string()),
                temperature: Some(Decimal::from(28)),
                humidity: None,
                wind_speed: None,
                remarks: None,
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_uses_reference_as_created_at() {
        let fx = fixture();
        let author = test_user();
        let project = seed_project(&fx.projects, &author, "Depot");
        let reference = at(2025, 1, 15, 9, 30, 0);

        let detail = fx
            .service
            .create(project.id, &author, contents("Slab poured"), reference)
            .await
            .unwrap();

        assert_eq!(detail.report.created_at, reference);
        assert_eq!(detail.report.author_name, author.display_name());
        assert_eq!(detail.report.status, ReviewStatus::Unreviewed);
        assert_eq!(detail.labour.len(), 1);
    }

    #[tokio::test]
    async fn test_create_for_unknown_project_is_not_found() {
        let fx = fixture();
        let result = fx
            .service
            .create(Uuid::now_v7(), &test_user(), contents("x"), Utc::now())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_negative_delay_is_rejected() {
        let fx = fixture();
        let author = test_user();
        let project = seed_project(&fx.projects, &author, "Depot");
        let mut bad = contents("x");
        bad.delay_hours = Some(Decimal::from(-2));

        let result = fx.service.create(project.id, &author, bad, Utc::now()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_replace_contents_drops_previous_records() {
        let fx = fixture();
        let author = test_user();
        let project = seed_project(&fx.projects, &author, "Depot");
        let created = fx
            .service
            .create(project.id, &author, contents("Day one"), Utc::now())
            .await
            .unwrap();

        let replacement = ReportContents {
            progress_notes: "Rained out".to_string(),
            ..Default::default()
        };
        let replaced = fx
            .service
            .replace_contents(created.report.id, replacement)
            .await
            .unwrap();

        assert_eq!(replaced.report.progress_notes, "Rained out");
        assert!(replaced.labour.is_empty());
        assert!(replaced.plant.is_empty());
        assert!(replaced.weather.is_none());
        assert!(replaced.report.photo_urls.is_empty());
        assert_eq!(fx.repository.weather_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_report_and_weather() {
        let fx = fixture();
        let author = test_user();
        let project = seed_project(&fx.projects, &author, "Depot");
        let created = fx
            .service
            .create(project.id, &author, contents("Day one"), Utc::now())
            .await
            .unwrap();
        assert_eq!(fx.repository.weather_count(), 1);

        fx.service.delete(created.report.id).await.unwrap();

        assert_eq!(fx.repository.weather_count(), 0);
        assert!(matches!(
            fx.service.get(created.report.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            fx.service.delete(created.report.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_set_status() {
        let fx = fixture();
        let author = test_user();
        let project = seed_project(&fx.projects, &author, "Depot");
        let created = fx
            .service
            .create(project.id, &author, contents("Day one"), Utc::now())
            .await
            .unwrap();

        let approved = fx
            .service
            .set_status(created.report.id, ReviewStatus::Approved)
            .await
            .unwrap();

        assert_eq!(approved.report.status, ReviewStatus::Approved);
        assert_eq!(approved.report.status.code(), 1);
        assert_eq!(approved.labour.len(), 1);
    }

    #[tokio::test]
    async fn test_feed_is_newest_first_and_range_is_inclusive() {
        let fx = fixture();
        let author = test_user();
        let project = seed_project(&fx.projects, &author, "Depot");
        for (notes, reference) in [
            ("day 13", at(2025, 1, 13, 0, 0, 0)),
            ("day 18", at(2025, 1, 18, 23, 59, 59)),
            ("day 19", at(2025, 1, 19, 0, 0, 0)),
        ] {
            fx.service
                .create(project.id, &author, contents(notes), reference)
                .await
                .unwrap();
        }

        let feed = fx.service.feed(project.id).await.unwrap();
        let notes: Vec<_> = feed.iter().map(|d| d.report.progress_notes.as_str()).collect();
        assert_eq!(notes, vec!["day 19", "day 18", "day 13"]);

        let week = Period::new(date(2025, 1, 13), date(2025, 1, 18)).unwrap();
        let ranged = fx.service.feed_in_range(project.id, week).await.unwrap();
        let notes: Vec<_> = ranged
            .iter()
            .map(|d| d.report.progress_notes.as_str())
            .collect();
        assert_eq!(notes, vec!["day 18", "day 13"]);
    }
}
