//! SMTP delivery for alert emails.
//!
//! Wraps lettre's `AsyncSmtpTransport`. A fresh transport is opened for each
//! message and dropped afterwards, so a run with nothing to send never
//! touches the relay.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use courier_common::config::AppConfig;

/// Failure during SMTP connection, authentication, or transmission.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

/// Outbound mail delivery.
#[async_trait]
pub trait Mailer {
    /// Send a single HTML email. One attempt per call; retries are the
    /// caller's responsibility.
    async fn send(&self, subject: &str, html_body: &str) -> Result<(), DeliveryError>;
}

/// SMTP mailer sending from one configured address to one or more
/// configured recipients.
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: Option<Credentials>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl SmtpMailer {
    /// Build a mailer from the application configuration.
    ///
    /// Sender and recipient addresses are parsed here so a misconfigured
    /// address fails the run before any send is attempted. Credentials are
    /// attached only when an SMTP username is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, DeliveryError> {
        let from = config
            .email_from
            .parse()
            .map_err(|e| DeliveryError::InvalidAddress(format!("{}: {e}", config.email_from)))?;

        let to = config
            .recipients()
            .into_iter()
            .map(|addr| {
                addr.parse()
                    .map_err(|e| DeliveryError::InvalidAddress(format!("{addr}: {e}")))
            })
            .collect::<Result<Vec<Mailbox>, _>>()?;

        if to.is_empty() {
            return Err(DeliveryError::InvalidAddress(
                "no recipient addresses configured".to_string(),
            ));
        }

        let credentials = config
            .smtp_user
            .as_ref()
            .map(|user| Credentials::new(user.clone(), config.smtp_password.clone()));

        Ok(Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            credentials,
            from,
            to,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, subject: &str, html_body: &str) -> Result<(), DeliveryError> {
        let mut builder = Message::builder().from(self.from.clone()).subject(subject);
        for mailbox in &self.to {
            builder = builder.to(mailbox.clone());
        }

        // Single text/html part, mirroring the alert rows' HTML bodies.
        let message = builder
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| DeliveryError::Build(e.to_string()))?;

        // builder_dangerous: plain SMTP without TLS, for port-25 relays.
        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host).port(self.port);
        if let Some(credentials) = &self.credentials {
            transport_builder = transport_builder.credentials(credentials.clone());
        }
        let transport = transport_builder.build();

        transport
            .send(message)
            .await
            .map_err(|e| DeliveryError::Smtp(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(email_from: &str, email_to: &str) -> AppConfig {
        AppConfig {
            db_host: "localhost".to_string(),
            db_name: "postgres".to_string(),
            db_user: "postgres".to_string(),
            db_password: String::new(),
            smtp_host: "localhost".to_string(),
            smtp_port: 25,
            smtp_user: None,
            smtp_password: String::new(),
            email_from: email_from.to_string(),
            email_to: email_to.to_string(),
            db_max_connections: 5,
        }
    }

    #[test]
    fn test_from_config_parses_recipient_list() {
        let config = test_config("monitor@example.com", "dba@example.com, ops@example.com");
        let mailer = SmtpMailer::from_config(&config).unwrap();
        assert_eq!(mailer.to.len(), 2);
    }

    #[test]
    fn test_from_config_rejects_invalid_sender() {
        let config = test_config("not an address", "dba@example.com");
        let result = SmtpMailer::from_config(&config);
        assert!(matches!(result, Err(DeliveryError::InvalidAddress(_))));
    }

    #[test]
    fn test_from_config_rejects_invalid_recipient() {
        let config = test_config("monitor@example.com", "dba@example.com,broken");
        let result = SmtpMailer::from_config(&config);
        assert!(matches!(result, Err(DeliveryError::InvalidAddress(_))));
    }

    #[test]
    fn test_from_config_rejects_empty_recipient_list() {
        // Only empty segments: parses to zero recipients, which must fail
        // at startup rather than on every send
        let config = test_config("monitor@example.com", " , ");
        let result = SmtpMailer::from_config(&config);
        assert!(matches!(result, Err(DeliveryError::InvalidAddress(_))));
    }

    #[test]
    fn test_credentials_only_with_username() {
        let mut config = test_config("monitor@example.com", "dba@example.com");
        let mailer = SmtpMailer::from_config(&config).unwrap();
        assert!(mailer.credentials.is_none());

        config.smtp_user = Some("relay-user".to_string());
        config.smtp_password = "secret".to_string();
        let mailer = SmtpMailer::from_config(&config).unwrap();
        assert!(mailer.credentials.is_some());
    }
}
