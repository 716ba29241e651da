use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::weekly_goals::models::{NewWeeklyGoal, WeeklyGoal};
use crate::shared::period::Period;

/// Storage for weekly goals.
///
/// `(project_id, period_start, period_end)` is unique; overlapping periods
/// with different bounds are allowed.
#[async_trait]
pub trait WeeklyGoalRepository: Send + Sync {
    /// Inserts all goals or none
    async fn insert_many(&self, project_id: Uuid, goals: &[NewWeeklyGoal])
        -> Result<Vec<WeeklyGoal>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WeeklyGoal>>;

    async fn find_by_period(&self, project_id: Uuid, period: &Period)
        -> Result<Option<WeeklyGoal>>;

    /// Single-statement create-or-update on the period key
    async fn upsert_for_period(&self, project_id: Uuid, goal: &NewWeeklyGoal)
        -> Result<WeeklyGoal>;

    async fn update(&self, goal: &WeeklyGoal) -> Result<Option<WeeklyGoal>>;

    /// Returns false when the goal did not exist
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Ascending by period start
    async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<WeeklyGoal>>;

    /// Goals with `period_start < date`, descending by period start
    async fn list_started_before(&self, project_id: Uuid, date: NaiveDate)
        -> Result<Vec<WeeklyGoal>>;
}

pub struct PgWeeklyGoalRepository {
    pool: PgPool,
}

impl PgWeeklyGoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const GOAL_COLUMNS: &str =
    "id, project_id, title, description, period_start, period_end, created_at, updated_at";

fn period_taken(e: sqlx::Error) -> AppError {
    AppError::from_unique_violation(e, "A goal already exists for this period")
}

#[async_trait]
impl WeeklyGoalRepository for PgWeeklyGoalRepository {
    async fn insert_many(
        &self,
        project_id: Uuid,
        goals: &[NewWeeklyGoal],
    ) -> Result<Vec<WeeklyGoal>> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            r#"
            INSERT INTO weekly_goals (id, project_id, title, description, period_start, period_end)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {GOAL_COLUMNS}
            "#
        );

        let mut created = Vec::with_capacity(goals.len());
        for goal in goals {
            let row = sqlx::query_as::<_, WeeklyGoal>(&sql)
                .bind(Uuid::now_v7())
                .bind(project_id)
                .bind(&goal.title)
                .bind(&goal.description)
                .bind(goal.period.start)
                .bind(goal.period.end)
                .fetch_one(&mut *tx)
                .await
                .map_err(period_taken)?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WeeklyGoal>> {
        let row = sqlx::query_as::<_, WeeklyGoal>(&format!(
            "SELECT {GOAL_COLUMNS} FROM weekly_goals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_period(
        &self,
        project_id: Uuid,
        period: &Period,
    ) -> Result<Option<WeeklyGoal>> {
        let row = sqlx::query_as::<_, WeeklyGoal>(&format!(
            r#"
            SELECT {GOAL_COLUMNS}
            FROM weekly_goals
            WHERE project_id = $1 AND period_start = $2 AND period_end = $3
            "#
        ))
        .bind(project_id)
        .bind(period.start)
        .bind(period.end)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_for_period(
        &self,
        project_id: Uuid,
        goal: &NewWeeklyGoal,
    ) -> Result<WeeklyGoal> {
        sqlx::query_as::<_, WeeklyGoal>(&format!(
            r#"
            INSERT INTO weekly_goals (id, project_id, title, description, period_start, period_end)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (project_id, period_start, period_end)
            DO UPDATE SET title = EXCLUDED.title,
                          description = EXCLUDED.description,
                          updated_at = NOW()
            RETURNING {GOAL_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(project_id)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.period.start)
        .bind(goal.period.end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert weekly goal: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn update(&self, goal: &WeeklyGoal) -> Result<Option<WeeklyGoal>> {
        sqlx::query_as::<_, WeeklyGoal>(&format!(
            r#"
            UPDATE weekly_goals
            SET title = $2, description = $3, period_start = $4, period_end = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {GOAL_COLUMNS}
            "#
        ))
        .bind(goal.id)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.period_start)
        .bind(goal.period_end)
        .fetch_optional(&self.pool)
        .await
        .map_err(period_taken)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM weekly_goals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<WeeklyGoal>> {
        let rows = sqlx::query_as::<_, WeeklyGoal>(&format!(
            r#"
            SELECT {GOAL_COLUMNS}
            FROM weekly_goals
            WHERE project_id = $1
            ORDER BY period_start ASC, period_end ASC
            "#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_started_before(
        &self,
        project_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<WeeklyGoal>> {
        let rows = sqlx::query_as::<_, WeeklyGoal>(&format!(
            r#"
            SELECT {GOAL_COLUMNS}
            FROM weekly_goals
            WHERE project_id = $1 AND period_start < $2
            ORDER BY period_start DESC, period_end DESC
            "#
        ))
        .bind(project_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
