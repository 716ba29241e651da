use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::notifications::models::InvitationEmail;

/// Outgoing mail transport
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_invitation(&self, invitation: &InvitationEmail) -> Result<()>;
}

/// Used when no SMTP relay is configured; the invitation is only logged
pub struct LogNotifier {
    frontend_url: String,
}

impl LogNotifier {
    pub fn new(frontend_url: String) -> Self {
        Self { frontend_url }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_invitation(&self, invitation: &InvitationEmail) -> Result<()> {
        tracing::info!(
            "SMTP not configured, invitation for {} to project {} not mailed (link: {})",
            invitation.email,
            invitation.project_id,
            invitation.signup_link(&self.frontend_url)
        );
        Ok(())
    }
}
