use minijinja::context;
use uuid::Uuid;

use crate::shared::templates::{render_template, TemplateError};

/// Invitation queued for a referral contributor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationEmail {
    pub email: String,
    pub project_id: Uuid,
    pub project_name: String,
}

/// Rendered subject and bodies of an invitation
#[derive(Debug, Clone)]
pub struct InvitationMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl InvitationEmail {
    pub fn signup_link(&self, frontend_url: &str) -> String {
        format!(
            "{}/signup?projectId={}",
            frontend_url.trim_end_matches('/'),
            self.project_id
        )
    }

    pub fn render(&self, frontend_url: &str) -> Result<InvitationMessage, TemplateError> {
        let ctx = context! {
            project_name => &self.project_name,
            signup_link => self.signup_link(frontend_url),
        };

        Ok(InvitationMessage {
            subject: format!("You're invited to join {} on SiteLog", self.project_name),
            text: render_template("mail/invitation.txt.jinja", &ctx)?,
            html: render_template("mail/invitation.html.jinja", &ctx)?,
        })
    }
}
