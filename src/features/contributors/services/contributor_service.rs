//! Contributor registry: invitations, signup reconciliation and the
//! accept/decline state machine.

use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::AuthenticatedUser;
use crate::features::contributors::dtos::{
    InviteContributorDto, PermissionEditDto, PermissionEditResultDto,
};
use crate::features::contributors::models::{
    Contributor, ContributorInvite, InvitationDecision, NewContributor, PendingInvitation,
};
use crate::features::contributors::repositories::ContributorRepository;
use crate::features::notifications::{InvitationEmail, NotificationDispatcher};
use crate::features::projects::models::Project;
use crate::features::projects::repositories::ProjectRepository;
use crate::features::users::UserDirectory;
use crate::shared::types::normalize_email;

pub struct ContributorService {
    repository: Arc<dyn ContributorRepository>,
    projects: Arc<dyn ProjectRepository>,
    directory: Arc<dyn UserDirectory>,
    notifications: NotificationDispatcher,
}

impl ContributorService {
    pub fn new(
        repository: Arc<dyn ContributorRepository>,
        projects: Arc<dyn ProjectRepository>,
        directory: Arc<dyn UserDirectory>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            repository,
            projects,
            directory,
            notifications,
        }
    }

    /// Validates and normalizes an invite batch without touching the store.
    ///
    /// Emails repeated inside the batch are rejected the same way as emails
    /// already on the project.
    pub fn prepare_batch(entries: Vec<InviteContributorDto>) -> Result<Vec<ContributorInvite>> {
        if entries.is_empty() {
            return Err(AppError::Validation(
                "At least one contributor is required".to_string(),
            ));
        }

        let mut invites: Vec<ContributorInvite> = Vec::with_capacity(entries.len());
        let mut repeated: Vec<String> = Vec::new();

        for entry in entries {
            let entry = InviteContributorDto {
                email: normalize_email(&entry.email),
                ..entry
            };
            entry
                .validate()
                .map_err(|e| AppError::Validation(format!("{}: {}", entry.email, e)))?;

            if invites.iter().any(|invite| invite.email == entry.email) {
                if !repeated.contains(&entry.email) {
                    repeated.push(entry.email);
                }
                continue;
            }

            invites.push(ContributorInvite {
                email: entry.email,
                permission: entry.permission,
            });
        }

        if !repeated.is_empty() {
            return Err(AppError::AlreadyInvited(repeated));
        }

        Ok(invites)
    }

    /// Add contributors to a project owned by `actor`
    pub async fn invite(
        &self,
        actor: &AuthenticatedUser,
        project_id: Uuid,
        entries: Vec<InviteContributorDto>,
    ) -> Result<Vec<Contributor>> {
        let invites = Self::prepare_batch(entries)?;
        let project = self.owned_project(actor, project_id).await?;
        self.invite_prepared(&project, invites).await
    }

    /// All-or-nothing insert of a prepared batch, then invitation mail for
    /// every referral.
    pub async fn invite_prepared(
        &self,
        project: &Project,
        invites: Vec<ContributorInvite>,
    ) -> Result<Vec<Contributor>> {
        let emails: Vec<String> = invites.iter().map(|i| i.email.clone()).collect();

        let existing = self
            .repository
            .find_existing_emails(project.id, &emails)
            .await?;
        if !existing.is_empty() {
            let conflicting = emails
                .into_iter()
                .filter(|email| existing.contains(email))
                .collect();
            return Err(AppError::AlreadyInvited(conflicting));
        }

        let accounts = join_all(invites.iter().map(|i| self.lookup_account(&i.email))).await;
        let rows: Vec<NewContributor> = invites
            .into_iter()
            .zip(accounts)
            .map(|(invite, linked_user_id)| NewContributor {
                email: invite.email,
                permission: invite.permission,
                linked_user_id,
            })
            .collect();

        let mut created = self.repository.insert_batch(project.id, &rows).await?;
        self.link_late_signups(&mut created).await;

        let mut queued = 0;
        for contributor in created.iter().filter(|c| c.is_referral) {
            if self.notifications.enqueue_invitation(InvitationEmail {
                email: contributor.email.clone(),
                project_id: project.id,
                project_name: project.name.clone(),
            }) {
                queued += 1;
            }
        }

        tracing::info!(
            "Invited {} contributors to project {} ({} invitation mails queued)",
            created.len(),
            project.id,
            queued
        );

        Ok(created)
    }

    /// Directory failures are logged and treated as "no account"
    async fn lookup_account(&self, email: &str) -> Option<Uuid> {
        match self.directory.find_user_by_email(email).await {
            Ok(user) => user.map(|u| u.id),
            Err(e) => {
                tracing::warn!(
                    "User directory lookup for {} failed, inviting as referral: {:?}",
                    email,
                    e
                );
                None
            }
        }
    }

    /// Links rows whose account was created between the lookup and the insert
    async fn link_late_signups(&self, created: &mut [Contributor]) {
        for contributor in created.iter_mut().filter(|c| c.linked_user_id.is_none()) {
            let Some(user_id) = self.lookup_account(&contributor.email).await else {
                continue;
            };

            match self.repository.link_user(&contributor.email, user_id).await {
                Ok(rows) => {
                    if let Some(row) = rows.into_iter().find(|r| r.id == contributor.id) {
                        *contributor = row;
                    }
                }
                Err(e) => tracing::warn!(
                    "Failed to link late signup {} to contributor {}: {:?}",
                    user_id,
                    contributor.id,
                    e
                ),
            }
        }
    }

    /// Link every contributor row for `email` to a newly created account.
    /// Safe to repeat; returns only the rows that changed.
    pub async fn reconcile_signup(&self, email: &str, user_id: Uuid) -> Result<Vec<Contributor>> {
        let email = normalize_email(email);
        let linked = self.repository.link_user(&email, user_id).await?;

        tracing::info!(
            "Reconciled signup of {}: {} contributor rows linked to user {}",
            email,
            linked.len(),
            user_id
        );

        Ok(linked)
    }

    /// Accept or decline a referral invitation.
    ///
    /// Never invited, already answered and not yet signed up all end in the
    /// same `NotFound`.
    pub async fn respond(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        decision: InvitationDecision,
    ) -> Result<Contributor> {
        let contributor = self
            .repository
            .respond(user_id, project_id, decision.into())
            .await?
            .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

        tracing::info!(
            "User {} answered invitation to project {}: {:?}",
            user_id,
            project_id,
            decision
        );

        Ok(contributor)
    }

    pub async fn edit_permissions(
        &self,
        actor: &AuthenticatedUser,
        project_id: Uuid,
        edits: Vec<PermissionEditDto>,
    ) -> Result<PermissionEditResultDto> {
        if edits.is_empty() {
            return Err(AppError::Validation(
                "At least one permission edit is required".to_string(),
            ));
        }
        self.owned_project(actor, project_id).await?;

        let mut result = PermissionEditResultDto::default();
        for edit in edits {
            let email = normalize_email(&edit.email);
            if self
                .repository
                .update_permission(project_id, &email, edit.permission)
                .await?
            {
                result.updated.push(email);
            } else {
                result.not_found.push(email);
            }
        }

        Ok(result)
    }

    pub async fn list(&self, project_id: Uuid) -> Result<Vec<Contributor>> {
        self.find_project(project_id).await?;
        self.repository.list_by_project(project_id).await
    }

    pub async fn pending_invitations(&self, user_id: Uuid) -> Result<Vec<PendingInvitation>> {
        self.repository.list_pending_invitations(user_id).await
    }

    async fn find_project(&self, project_id: Uuid) -> Result<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))
    }

    async fn owned_project(&self, actor: &AuthenticatedUser, project_id: Uuid) -> Result<Project> {
        let project = self.find_project(project_id).await?;
        if project.created_by != actor.user_id {
            return Err(AppError::Forbidden(
                "Only the project owner can manage contributors".to_string(),
            ));
        }
        Ok(project)
    }
}
