use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::contributors::models::{
    Contributor, InvitationState, NewContributor, PendingInvitation, Permission,
};

/// Storage for contributor rows.
///
/// `(project_id, email)` is unique in the store; implementations report a
/// violation of it as [`AppError::AlreadyInvited`].
#[async_trait]
pub trait ContributorRepository: Send + Sync {
    /// Which of `emails` already have a row for the project
    async fn find_existing_emails(&self, project_id: Uuid, emails: &[String])
        -> Result<Vec<String>>;

    /// Inserts all rows or none
    async fn insert_batch(
        &self,
        project_id: Uuid,
        entries: &[NewContributor],
    ) -> Result<Vec<Contributor>>;

    async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<Contributor>>;

    /// Links every row for `email` to `user_id` and marks it signed up.
    /// Rows already in that state are left untouched; only changed rows are returned.
    async fn link_user(&self, email: &str, user_id: Uuid) -> Result<Vec<Contributor>>;

    /// Moves a pending, signed-up referral invitation to `state`
    async fn respond(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        state: InvitationState,
    ) -> Result<Option<Contributor>>;

    /// Returns false when no row matches
    async fn update_permission(
        &self,
        project_id: Uuid,
        email: &str,
        permission: Permission,
    ) -> Result<bool>;

    async fn list_pending_invitations(&self, user_id: Uuid) -> Result<Vec<PendingInvitation>>;
}

pub struct PgContributorRepository {
    pool: PgPool,
}

impl PgContributorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CONTRIBUTOR_COLUMNS: &str = "id, project_id, email, permission, linked_user_id, \
    is_referral, membership_state, invitation_state, created_at, updated_at";

#[async_trait]
impl ContributorRepository for PgContributorRepository {
    async fn find_existing_emails(
        &self,
        project_id: Uuid,
        emails: &[String],
    ) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT email
            FROM contributors
            WHERE project_id = $1 AND email = ANY($2)
            "#,
        )
        .bind(project_id)
        .bind(emails)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(email,)| email).collect())
    }

    async fn insert_batch(
        &self,
        project_id: Uuid,
        entries: &[NewContributor],
    ) -> Result<Vec<Contributor>> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            r#"
            INSERT INTO contributors
                (id, project_id, email, permission, linked_user_id, is_referral, membership_state)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CONTRIBUTOR_COLUMNS}
            "#
        );

        let mut created = Vec::with_capacity(entries.len());
        for entry in entries {
            let row = sqlx::query_as::<_, Contributor>(&sql)
                .bind(Uuid::now_v7())
                .bind(project_id)
                .bind(&entry.email)
                .bind(entry.permission)
                .bind(entry.linked_user_id)
                .bind(entry.is_referral())
                .bind(entry.membership_state())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| match &e {
                    sqlx::Error::Database(db) if db.is_unique_violation() => {
                        AppError::AlreadyInvited(vec![entry.email.clone()])
                    }
                    _ => {
                        tracing::error!("Failed to insert contributor: {:?}", e);
                        AppError::Database(e)
                    }
                })?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<Contributor>> {
        let sql = format!(
            "SELECT {CONTRIBUTOR_COLUMNS} FROM contributors WHERE project_id = $1 ORDER BY created_at"
        );
        let rows = sqlx::query_as::<_, Contributor>(&sql)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn link_user(&self, email: &str, user_id: Uuid) -> Result<Vec<Contributor>> {
        let sql = format!(
            r#"
            UPDATE contributors
            SET linked_user_id = $2, membership_state = 'signed_up', updated_at = NOW()
            WHERE email = $1
              AND (linked_user_id IS DISTINCT FROM $2 OR membership_state <> 'signed_up')
            RETURNING {CONTRIBUTOR_COLUMNS}
            "#
        );
        let rows = sqlx::query_as::<_, Contributor>(&sql)
            .bind(email)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to link contributors to user {}: {:?}", user_id, e);
                AppError::Database(e)
            })?;
        Ok(rows)
    }

    async fn respond(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        state: InvitationState,
    ) -> Result<Option<Contributor>> {
        let sql = format!(
            r#"
            UPDATE contributors
            SET invitation_state = $3, updated_at = NOW()
            WHERE linked_user_id = $1
              AND project_id = $2
              AND invitation_state = 'pending'
              AND membership_state = 'signed_up'
              AND is_referral
            RETURNING {CONTRIBUTOR_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Contributor>(&sql)
            .bind(user_id)
            .bind(project_id)
            .bind(state)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_permission(
        &self,
        project_id: Uuid,
        email: &str,
        permission: Permission,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE contributors
            SET permission = $3, updated_at = NOW()
            WHERE project_id = $1 AND email = $2
            "#,
        )
        .bind(project_id)
        .bind(email)
        .bind(permission)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_pending_invitations(&self, user_id: Uuid) -> Result<Vec<PendingInvitation>> {
        let rows = sqlx::query_as::<_, PendingInvitation>(
            r#"
            SELECT c.id AS contributor_id, c.project_id, p.name AS project_name,
                   c.permission, c.created_at AS invited_at
            FROM contributors c
            JOIN projects p ON p.id = c.project_id
            WHERE c.linked_user_id = $1
              AND c.invitation_state = 'pending'
              AND c.membership_state = 'signed_up'
              AND c.is_referral
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
