use tokio::sync::mpsc::{self, error::TrySendError};

use crate::features::notifications::models::InvitationEmail;

/// Producer side of the invitation queue
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<InvitationEmail>,
}

impl NotificationDispatcher {
    /// Creates the queue; the receiver goes to the invitation mailer worker
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<InvitationEmail>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Never blocks. Returns false when the mail was dropped.
    pub fn enqueue_invitation(&self, invitation: InvitationEmail) -> bool {
        match self.sender.try_send(invitation) {
            Ok(()) => true,
            Err(TrySendError::Full(invitation)) => {
                tracing::warn!(
                    "Invitation queue full, dropping mail to {} for project {}",
                    invitation.email,
                    invitation.project_id
                );
                false
            }
            Err(TrySendError::Closed(invitation)) => {
                tracing::error!(
                    "Invitation mailer stopped, dropping mail to {} for project {}",
                    invitation.email,
                    invitation.project_id
                );
                false
            }
        }
    }
}
