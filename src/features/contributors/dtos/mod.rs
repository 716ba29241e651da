mod contributor_dto;

pub use contributor_dto::{
    ContributorResponseDto, EditPermissionsDto, InviteContributorDto, InviteContributorsDto,
    PendingInvitationDto, PermissionEditDto, PermissionEditResultDto, RespondInvitationDto,
};
