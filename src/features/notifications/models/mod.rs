mod invitation_email;

pub use invitation_email::InvitationEmail;
