use std::sync::Arc;

use tokio::sync::mpsc;

use crate::features::notifications::clients::Notifier;
use crate::features::notifications::models::InvitationEmail;

/// Background worker that drains the invitation queue.
/// Stops once every [`NotificationDispatcher`](crate::features::notifications::NotificationDispatcher) is dropped.
pub struct InvitationMailer {
    receiver: mpsc::Receiver<InvitationEmail>,
    notifier: Arc<dyn Notifier>,
}

impl InvitationMailer {
    pub fn new(receiver: mpsc::Receiver<InvitationEmail>, notifier: Arc<dyn Notifier>) -> Self {
        Self { receiver, notifier }
    }

    pub async fn run(mut self) {
        tracing::info!("Starting invitation mailer worker");

        while let Some(invitation) = self.receiver.recv().await {
            self.deliver(&invitation).await;
        }

        tracing::info!("Invitation queue closed, mailer worker stopped");
    }

    async fn deliver(&self, invitation: &InvitationEmail) {
        match self.notifier.send_invitation(invitation).await {
            Ok(()) => tracing::info!(
                "Invitation sent to {} for project {}",
                invitation.email,
                invitation.project_id
            ),
            Err(e) => tracing::error!(
                "Failed to send invitation to {} for project {}: {:?}",
                invitation.email,
                invitation.project_id,
                e
            ),
        }
    }
}
