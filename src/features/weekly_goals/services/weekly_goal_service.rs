//! Goal/report aggregation: what happened in a project during a period.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::daily_reports::models::{DailyReportDetail, ReportOrder};
use crate::features::daily_reports::repositories::DailyReportRepository;
use crate::features::projects::repositories::ProjectRepository;
use crate::features::weekly_goals::dtos::{
    CreateWeeklyGoalDto, UpdateWeeklyGoalDto, UpsertWeeklyGoalDto,
};
use crate::features::weekly_goals::models::{NewWeeklyGoal, WeeklyGoal};
use crate::features::weekly_goals::repositories::WeeklyGoalRepository;
use crate::shared::period::{Period, WeekPolicy};

/// Number of goals created with every new project
pub const SEEDED_GOAL_COUNT: usize = 4;

pub struct WeeklyGoalService {
    repository: Arc<dyn WeeklyGoalRepository>,
    reports: Arc<dyn DailyReportRepository>,
    projects: Arc<dyn ProjectRepository>,
    policy: WeekPolicy,
}

impl WeeklyGoalService {
    pub fn new(
        repository: Arc<dyn WeeklyGoalRepository>,
        reports: Arc<dyn DailyReportRepository>,
        projects: Arc<dyn ProjectRepository>,
        policy: WeekPolicy,
    ) -> Self {
        Self {
            repository,
            reports,
            projects,
            policy,
        }
    }

    pub fn policy(&self) -> &WeekPolicy {
        &self.policy
    }

    pub fn current_period(&self, reference: DateTime<Utc>) -> Result<Period> {
        self.policy.current_period(reference).ok_or_else(|| {
            AppError::Validation(format!(
                "{} is outside the supported calendar range",
                reference
            ))
        })
    }

    /// Exact match on the period bounds
    pub async fn goal_for_period(&self, project_id: Uuid, period: Period) -> Result<WeeklyGoal> {
        self.repository
            .find_by_period(project_id, &period)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No goal for {} to {}",
                    period.start, period.end
                ))
            })
    }

    /// Create the goal for `period`, or overwrite its title and description
    pub async fn upsert_goal_for_period(
        &self,
        project_id: Uuid,
        period: Period,
        dto: UpsertWeeklyGoalDto,
    ) -> Result<WeeklyGoal> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let title = required_title(&dto.title)?;
        self.ensure_project(project_id).await?;

        let goal = self
            .repository
            .upsert_for_period(
                project_id,
                &NewWeeklyGoal {
                    title,
                    description: dto.description,
                    period,
                },
            )
            .await?;

        tracing::info!(
            "Weekly goal upserted: id={}, project={}, period={}..{}",
            goal.id,
            project_id,
            period.start,
            period.end
        );

        Ok(goal)
    }

    pub async fn current_goal(
        &self,
        project_id: Uuid,
        reference: DateTime<Utc>,
    ) -> Result<WeeklyGoal> {
        self.goal_for_period(project_id, self.current_period(reference)?)
            .await
    }

    pub async fn upsert_current_goal(
        &self,
        project_id: Uuid,
        reference: DateTime<Utc>,
        dto: UpsertWeeklyGoalDto,
    ) -> Result<WeeklyGoal> {
        self.upsert_goal_for_period(project_id, self.current_period(reference)?, dto)
            .await
    }

    /// Batch create; every goal needs title, description and a valid range
    pub async fn create_goals(
        &self,
        project_id: Uuid,
        goals: Vec<CreateWeeklyGoalDto>,
    ) -> Result<Vec<WeeklyGoal>> {
        if goals.is_empty() {
            return Err(AppError::Validation(
                "At least one goal is required".to_string(),
            ));
        }

        let mut new_goals = Vec::with_capacity(goals.len());
        for goal in goals {
            goal.validate()
                .map_err(|e| AppError::Validation(e.to_string()))?;
            new_goals.push(NewWeeklyGoal {
                title: required_title(&goal.title)?,
                description: Some(goal.description.trim().to_string()),
                period: checked_period(goal.period_start, goal.period_end)?,
            });
        }

        self.ensure_project(project_id).await?;
        self.repository.insert_many(project_id, &new_goals).await
    }

    /// `count` consecutive goals named "Week 1".."Week N", starting with the
    /// period covering `reference`
    pub async fn seed_goals(
        &self,
        project_id: Uuid,
        reference: DateTime<Utc>,
        count: usize,
    ) -> Result<Vec<WeeklyGoal>> {
        let goals: Vec<NewWeeklyGoal> = self
            .policy
            .consecutive(reference, count)
            .into_iter()
            .enumerate()
            .map(|(i, period)| NewWeeklyGoal {
                title: format!("Week {}", i + 1),
                description: None,
                period,
            })
            .collect();

        self.repository.insert_many(project_id, &goals).await
    }

    pub async fn get(&self, id: Uuid) -> Result<WeeklyGoal> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| goal_not_found(id))
    }

    pub async fn update(&self, id: Uuid, dto: UpdateWeeklyGoalDto) -> Result<WeeklyGoal> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let mut goal = self.get(id).await?;

        if let Some(title) = dto.title {
            goal.title = required_title(&title)?;
        }
        if let Some(description) = dto.description {
            goal.description = Some(description);
        }
        let period = checked_period(
            dto.period_start.unwrap_or(goal.period_start),
            dto.period_end.unwrap_or(goal.period_end),
        )?;
        goal.period_start = period.start;
        goal.period_end = period.end;

        self.repository
            .update(&goal)
            .await?
            .ok_or_else(|| goal_not_found(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(goal_not_found(id));
        }
        tracing::info!("Weekly goal deleted: id={}", id);
        Ok(())
    }

    /// All goals of the project, ascending by period start
    pub async fn list(&self, project_id: Uuid) -> Result<Vec<WeeklyGoal>> {
        self.ensure_project(project_id).await?;
        self.repository.list_by_project(project_id).await
    }

    /// Goals that started before the current period, most recent first
    pub async fn past_goals(
        &self,
        project_id: Uuid,
        reference: DateTime<Utc>,
    ) -> Result<Vec<WeeklyGoal>> {
        self.ensure_project(project_id).await?;
        let current = self.current_period(reference)?;
        self.repository
            .list_started_before(project_id, current.start)
            .await
    }

    /// Reports created within the inclusive day range, oldest first
    pub async fn reports_in_range(
        &self,
        project_id: Uuid,
        period: Period,
    ) -> Result<Vec<DailyReportDetail>> {
        self.ensure_project(project_id).await?;
        let bounds = self.policy.period_bounds(&period)?;
        self.reports
            .list_by_project(
                project_id,
                Some(bounds),
                ReportOrder::OldestFirst,
            )
            .await
    }

    /// The goal and the reports filed within its stored period
    pub async fn reports_for_goal(
        &self,
        goal_id: Uuid,
    ) -> Result<(WeeklyGoal, Vec<DailyReportDetail>)> {
        let goal = self.get(goal_id).await?;
        let reports = self.reports_in_range(goal.project_id, goal.period()).await?;
        Ok((goal, reports))
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

fn goal_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Weekly goal {} not found", id))
}

fn required_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    Ok(title.to_string())
}

fn checked_period(start: chrono::NaiveDate, end: chrono::NaiveDate) -> Result<Period> {
    Period::checked(start, end, ("period_start", "period_end"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::daily_reports::models::{NewDailyReport, ReportContents};
    use crate::shared::test_helpers::{
        at, date, seed_project, test_user, InMemoryDailyReportRepository,
        InMemoryProjectRepository, InMemoryWeeklyGoalRepository,
    };

    struct Fixture {
        service: WeeklyGoalService,
        repository: Arc<InMemoryWeeklyGoalRepository>,
        reports: Arc<InMemoryDailyReportRepository>,
        project_id: Uuid,
    }

    fn fixture() -> Fixture {
        let repository = Arc::new(InMemoryWeeklyGoalRepository::default());
        let reports = Arc::new(InMemoryDailyReportRepository::default());
        let projects = Arc::new(InMemoryProjectRepository::default());
        let project = seed_project(&projects, &test_user(), "Riverside Tower");

        Fixture {
            service: WeeklyGoalService::new(
                repository.clone(),
                reports.clone(),
                projects,
                WeekPolicy::default(),
            ),
            repository,
            reports,
            project_id: project.id,
        }
    }

    fn upsert(title: &str, description: &str) -> UpsertWeeklyGoalDto {
        UpsertWeeklyGoalDto {
            title: title.to_string(),
            description: Some(description.to_string()),
        }
    }

    fn week_of_jan_13() -> Period {
        Period::new(date(2025, 1, 13), date(2025, 1, 18)).unwrap()
    }

    async fn file_report(fx: &Fixture, notes: &str, created_at: DateTime<Utc>) {
        let author = test_user();
        fx.reports
            .insert(&NewDailyReport {
                project_id: fx.project_id,
                created_by: author.user_id,
                author_name: author.display_name(),
                created_at,
                contents: ReportContents {
                    progress_notes: notes.to_string(),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_row_and_second_wins() {
        let fx = fixture();

        let first = fx
            .service
            .upsert_goal_for_period(fx.project_id, week_of_jan_13(), upsert("Frame", "first"))
            .await
            .unwrap();
        let second = fx
            .service
            .upsert_goal_for_period(fx.project_id, week_of_jan_13(), upsert("Roof", "second"))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(fx.repository.count_for(fx.project_id), 1);
        let stored = fx
            .service
            .goal_for_period(fx.project_id, week_of_jan_13())
            .await
            .unwrap();
        assert_eq!(stored.title, "Roof");
        assert_eq!(stored.description.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_goal_ending_at_calendar_limit_is_rejected() {
        let fx = fixture();

        let result = fx
            .service
            .create_goals(
                fx.project_id,
                vec![CreateWeeklyGoalDto {
                    title: "Forever".to_string(),
                    description: "never ends".to_string(),
                    period_start: date(2025, 1, 13),
                    period_end: chrono::NaiveDate::MAX,
                }],
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(fx.repository.count_for(fx.project_id), 0);
    }

    #[tokio::test]
    async fn test_reports_for_stored_goal_at_calendar_limit_is_validation_error() {
        let fx = fixture();
        let stored = fx
            .repository
            .insert_many(
                fx.project_id,
                &[NewWeeklyGoal {
                    title: "Legacy".to_string(),
                    description: None,
                    period: Period {
                        start: date(2025, 1, 13),
                        end: chrono::NaiveDate::MAX,
                    },
                }],
            )
            .await
            .unwrap();

        let result = fx.service.reports_for_goal(stored[0].id).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_goal_for_period_requires_exact_bounds() {
        let fx = fixture();
        fx.service
            .upsert_goal_for_period(fx.project_id, week_of_jan_13(), upsert("Frame", "x"))
            .await
            .unwrap();

        let shifted = Period::new(date(2025, 1, 13), date(2025, 1, 19)).unwrap();
        let result = fx.service.goal_for_period(fx.project_id, shifted).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_current_goal_uses_the_period_of_the_reference() {
        let fx = fixture();
        let wednesday = at(2025, 1, 15, 10, 0, 0);

        fx.service
            .upsert_current_goal(fx.project_id, wednesday, upsert("Pour slab", "L2"))
            .await
            .unwrap();

        let goal = fx
            .service
            .current_goal(fx.project_id, at(2025, 1, 18, 16, 0, 0))
            .await
            .unwrap();
        assert_eq!(goal.period(), week_of_jan_13());
    }

    #[tokio::test]
    async fn test_report_at_end_of_period_is_included_and_next_day_excluded() {
        let fx = fixture();
        let goal = fx
            .service
            .upsert_goal_for_period(fx.project_id, week_of_jan_13(), upsert("Frame", "x"))
            .await
            .unwrap();
        file_report(&fx, "late saturday", at(2025, 1, 18, 23, 59, 59)).await;
        file_report(&fx, "sunday midnight", at(2025, 1, 19, 0, 0, 0)).await;
        file_report(&fx, "monday start", at(2025, 1, 13, 0, 0, 0)).await;
        file_report(&fx, "sunday before", at(2025, 1, 12, 23, 59, 59)).await;

        let (resolved, reports) = fx.service.reports_for_goal(goal.id).await.unwrap();

        assert_eq!(resolved.id, goal.id);
        let notes: Vec<_> = reports
            .iter()
            .map(|r| r.report.progress_notes.as_str())
            .collect();
        assert_eq!(notes, vec!["monday start", "late saturday"]);
    }

    #[tokio::test]
    async fn test_reports_for_missing_goal_is_not_found() {
        let fx = fixture();
        let result = fx.service.reports_for_goal(Uuid::now_v7()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_past_goals_are_strictly_before_current_period() {
        let fx = fixture();
        let reference = at(2025, 1, 22, 12, 0, 0);
        fx.service
            .seed_goals(fx.project_id, at(2025, 1, 1, 12, 0, 0), 4)
            .await
            .unwrap();

        let past = fx.service.past_goals(fx.project_id, reference).await.unwrap();

        let starts: Vec<_> = past.iter().map(|g| g.period_start).collect();
        assert_eq!(
            starts,
            vec![date(2025, 1, 13), date(2025, 1, 6), date(2024, 12, 30)]
        );
    }

    #[tokio::test]
    async fn test_seed_goals_creates_consecutive_weeks() {
        let fx = fixture();

        let goals = fx
            .service
            .seed_goals(fx.project_id, at(2025, 1, 15, 8, 0, 0), SEEDED_GOAL_COUNT)
            .await
            .unwrap();

        let summary: Vec<_> = goals
            .iter()
            .map(|g| (g.title.as_str(), g.period_start, g.period_end))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Week 1", date(2025, 1, 13), date(2025, 1, 18)),
                ("Week 2", date(2025, 1, 20), date(2025, 1, 25)),
                ("Week 3", date(2025, 1, 27), date(2025, 2, 1)),
                ("Week 4", date(2025, 2, 3), date(2025, 2, 8)),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_goals_validates_every_entry() {
        let fx = fixture();
        let reversed = CreateWeeklyGoalDto {
            title: "Backwards".to_string(),
            description: "x".to_string(),
            period_start: date(2025, 1, 18),
            period_end: date(2025, 1, 13),
        };
        let no_description = CreateWeeklyGoalDto {
            title: "Frame".to_string(),
            description: String::new(),
            period_start: date(2025, 1, 13),
            period_end: date(2025, 1, 18),
        };

        for goal in [reversed, no_description] {
            let result = fx.service.create_goals(fx.project_id, vec![goal]).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
        assert!(matches!(
            fx.service.create_goals(fx.project_id, vec![]).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(fx.repository.count_for(fx.project_id), 0);
    }

    #[tokio::test]
    async fn test_overlapping_periods_are_tolerated() {
        // Only identical bounds are rejected; overlap is left to the caller.
        let fx = fixture();
        let goals = vec![
            CreateWeeklyGoalDto {
                title: "Frame".to_string(),
                description: "north".to_string(),
                period_start: date(2025, 1, 13),
                period_end: date(2025, 1, 18),
            },
            CreateWeeklyGoalDto {
                title: "Roof".to_string(),
                description: "south".to_string(),
                period_start: date(2025, 1, 15),
                period_end: date(2025, 1, 20),
            },
        ];

        let created = fx.service.create_goals(fx.project_id, goals).await.unwrap();

        assert_eq!(created.len(), 2);
        let listed = fx.service.list(fx.project_id).await.unwrap();
        assert_eq!(listed[0].title, "Frame");
        assert_eq!(listed[1].title, "Roof");
    }

    #[tokio::test]
    async fn test_identical_period_in_batch_is_conflict() {
        let fx = fixture();
        let goal = CreateWeeklyGoalDto {
            title: "Frame".to_string(),
            description: "x".to_string(),
            period_start: date(2025, 1, 13),
            period_end: date(2025, 1, 18),
        };

        let result = fx
            .service
            .create_goals(fx.project_id, vec![goal.clone(), goal])
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(fx.repository.count_for(fx.project_id), 0);
    }

    #[tokio::test]
    async fn test_update_rejects_reversed_dates_and_keeps_others() {
        let fx = fixture();
        let goal = fx
            .service
            .upsert_goal_for_period(fx.project_id, week_of_jan_13(), upsert("Frame", "x"))
            .await
            .unwrap();

        let reversed = fx
            .service
            .update(
                goal.id,
                UpdateWeeklyGoalDto {
                    period_end: Some(date(2025, 1, 10)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(reversed, Err(AppError::Validation(_))));

        let renamed = fx
            .service
            .update(
                goal.id,
                UpdateWeeklyGoalDto {
                    title: Some("  Frame L3 ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.title, "Frame L3");
        assert_eq!(renamed.period(), week_of_jan_13());
    }

    #[tokio::test]
    async fn test_delete_goal() {
        let fx = fixture();
        let goal = fx
            .service
            .upsert_goal_for_period(fx.project_id, week_of_jan_13(), upsert("Frame", "x"))
            .await
            .unwrap();

        fx.service.delete(goal.id).await.unwrap();

        assert!(matches!(fx.service.get(goal.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            fx.service.delete(goal.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
