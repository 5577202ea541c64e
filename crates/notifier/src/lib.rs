pub mod mailer;
pub mod processor;

pub use mailer::{DeliveryError, Mailer, SmtpMailer};
pub use processor::Notifier;
