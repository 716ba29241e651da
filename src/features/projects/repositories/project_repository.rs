use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::projects::models::{NewProject, Project};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn insert(&self, project: &NewProject) -> Result<Project>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>>;

    /// Projects created by `user_id`, newest first
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Project>>;

    /// Removes the project with its contributors, goals and reports
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn insert(&self, project: &NewProject) -> Result<Project> {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (id, name, description, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, created_by, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert project: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get project: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Project>> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM projects
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list projects: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete project: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
