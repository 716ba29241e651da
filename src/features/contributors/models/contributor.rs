use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Access level of a contributor on a project
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "contributor_permission", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    #[default]
    #[serde(alias = "can view")]
    View,
    #[serde(alias = "can edit")]
    Edit,
}

/// Whether the invited email is backed by an account yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "membership_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MembershipState {
    Pending,
    SignedUp,
}

/// Invitation answer. Only `Pending` may change; the other two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invitation_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvitationState {
    Pending,
    Accepted,
    Declined,
}

/// What an invited user may answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvitationDecision {
    Accepted,
    Declined,
}

impl From<InvitationDecision> for InvitationState {
    fn from(decision: InvitationDecision) -> Self {
        match decision {
            InvitationDecision::Accepted => InvitationState::Accepted,
            InvitationDecision::Declined => InvitationState::Declined,
        }
    }
}

/// Database model for contributor
#[derive(Debug, Clone, FromRow)]
pub struct Contributor {
    pub id: Uuid,
    pub project_id: Uuid,
    pub email: String,
    pub permission: Permission,
    pub linked_user_id: Option<Uuid>,
    pub is_referral: bool,
    pub membership_state: MembershipState,
    pub invitation_state: InvitationState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated, normalized invite entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorInvite {
    pub email: String,
    pub permission: Permission,
}

/// Row to insert for one invite, after the directory lookup
#[derive(Debug, Clone)]
pub struct NewContributor {
    pub email: String,
    pub permission: Permission,
    /// Account found for the email at invite time
    pub linked_user_id: Option<Uuid>,
}

impl NewContributor {
    pub fn is_referral(&self) -> bool {
        self.linked_user_id.is_none()
    }

    pub fn membership_state(&self) -> MembershipState {
        match self.linked_user_id {
            Some(_) => MembershipState::SignedUp,
            None => MembershipState::Pending,
        }
    }
}

/// Referral invitation still waiting for the invited user's answer
#[derive(Debug, Clone, FromRow)]
pub struct PendingInvitation {
    pub contributor_id: Uuid,
    pub project_id: Uuid,
    pub project_name: String,
    pub permission: Permission,
    pub invited_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_accepts_legacy_labels() {
        let edit: Permission = serde_json::from_str("\"can edit\"").unwrap();
        let view: Permission = serde_json::from_str("\"view\"").unwrap();
        assert_eq!(edit, Permission::Edit);
        assert_eq!(view, Permission::View);
        assert_eq!(serde_json::to_string(&edit).unwrap(), "\"edit\"");
    }

    #[test]
    fn test_new_contributor_without_account_is_referral() {
        let row = NewContributor {
            email: "a@x.com".to_string(),
            permission: Permission::View,
            linked_user_id: None,
        };
        assert!(row.is_referral());
        assert_eq!(row.membership_state(), MembershipState::Pending);

        let row = NewContributor {
            linked_user_id: Some(Uuid::now_v7()),
            ..row
        };
        assert!(!row.is_referral());
        assert_eq!(row.membership_state(), MembershipState::SignedUp);
    }
}
