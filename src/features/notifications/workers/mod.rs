mod invitation_mailer;

pub use invitation_mailer::InvitationMailer;
