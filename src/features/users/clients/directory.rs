use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};

/// Account as seen by the directory; the registry only links by id
#[derive(Debug, Clone, FromRow)]
pub struct DirectoryUser {
    pub id: Uuid,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Case-insensitive lookup
    async fn find_user_by_email(&self, email: &str) -> Result<Option<DirectoryUser>>;
}

/// Directory backed by the shared `users` table
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<DirectoryUser>> {
        sqlx::query_as::<_, DirectoryUser>(
            r#"
            SELECT id
            FROM users
            WHERE lower(email) = lower($1)
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::ExternalServiceError(format!("User directory lookup failed: {}", e)))
    }
}
