use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::contributors::models::{
    Contributor, InvitationDecision, InvitationState, MembershipState, PendingInvitation,
    Permission,
};

/// One email to invite
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct InviteContributorDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Defaults to `view`
    #[serde(default)]
    pub permission: Permission,
}

/// Request DTO for adding contributors to an existing project
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InviteContributorsDto {
    pub contributors: Vec<InviteContributorDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PermissionEditDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub permission: Permission,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EditPermissionsDto {
    pub edits: Vec<PermissionEditDto>,
}

/// Outcome of a permission edit batch
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PermissionEditResultDto {
    pub updated: Vec<String>,
    pub not_found: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RespondInvitationDto {
    pub decision: InvitationDecision,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContributorResponseDto {
    pub id: Uuid,
    pub project_id: Uuid,
    pub email: String,
    pub permission: Permission,
    pub linked_user_id: Option<Uuid>,
    pub is_referral: bool,
    pub membership_state: MembershipState,
    pub invitation_state: InvitationState,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PendingInvitationDto {
    pub contributor_id: Uuid,
    pub project_id: Uuid,
    pub project_name: String,
    pub permission: Permission,
    pub invited_at: DateTime<Utc>,
}

impl From<Contributor> for ContributorResponseDto {
    fn from(c: Contributor) -> Self {
        Self {
            id: c.id,
            project_id: c.project_id,
            email: c.email,
            permission: c.permission,
            linked_user_id: c.linked_user_id,
            is_referral: c.is_referral,
            membership_state: c.membership_state,
            invitation_state: c.invitation_state,
            created_at: c.created_at,
        }
    }
}

impl From<PendingInvitation> for PendingInvitationDto {
    fn from(p: PendingInvitation) -> Self {
        Self {
            contributor_id: p.contributor_id,
            project_id: p.project_id,
            project_name: p.project_name,
            permission: p.permission,
            invited_at: p.invited_at,
        }
    }
}
