mod notifier;
mod smtp;

pub use notifier::{LogNotifier, Notifier};
pub use smtp::SmtpNotifier;
