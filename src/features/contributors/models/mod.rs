mod contributor;

pub use contributor::{
    Contributor, ContributorInvite, InvitationDecision, InvitationState, MembershipState,
    NewContributor, PendingInvitation, Permission,
};
