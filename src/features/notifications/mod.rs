//! Invitation mail delivery.
//!
//! The contributor registry never sends mail inline. It hands an
//! [`InvitationEmail`] to the [`NotificationDispatcher`], a bounded queue drained
//! by the [`InvitationMailer`] worker. Delivery failures are logged by the
//! worker and never reach the request that queued the mail.

pub mod clients;
pub mod models;
pub mod services;
pub mod workers;

pub use clients::{LogNotifier, Notifier, SmtpNotifier};
pub use models::InvitationEmail;
pub use services::NotificationDispatcher;
pub use workers::InvitationMailer;
