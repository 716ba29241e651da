use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::core::config::MailConfig;
use crate::core::error::{AppError, Result};
use crate::features::notifications::clients::Notifier;
use crate::features::notifications::models::InvitationEmail;

/// Sends invitations through an SMTP relay (STARTTLS)
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    frontend_url: String,
}

impl SmtpNotifier {
    pub fn new(host: &str, config: &MailConfig, frontend_url: String) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AppError::Internal(format!("Invalid SMTP relay {}: {}", host, e)))?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = config
            .from_address
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid MAIL_FROM address: {}", e)))?;

        Ok(Self {
            transport: builder.build(),
            from,
            frontend_url,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_invitation(&self, invitation: &InvitationEmail) -> Result<()> {
        let to = invitation.email.parse::<Mailbox>().map_err(|e| {
            AppError::Validation(format!("Invalid recipient {}: {}", invitation.email, e))
        })?;
        let content = invitation.render(&self.frontend_url)?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(content.subject)
            .multipart(MultiPart::alternative_plain_html(content.text, content.html))
            .map_err(|e| AppError::Internal(format!("Failed to build invitation mail: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("SMTP send failed: {}", e)))?;

        Ok(())
    }
}
