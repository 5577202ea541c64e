use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One alert email awaiting delivery, read from `monitoring.log_email`.
///
/// The Portuguese column names (`id_email`, `assunto`, `corpo_html`,
/// `data_evento`) are aliased to these field names in the query.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmailLogEntry {
    pub id: i64,
    pub subject: String,
    pub body_html: String,
    /// Time the underlying alert occurred; used only for ordering.
    pub event_timestamp: DateTime<Utc>,
    pub processed: bool,
}

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::Sent => write!(f, "sent"),
            DeliveryStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Per-entry record of one notifier run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub id: i64,
    pub status: DeliveryStatus,
    /// Error description for failed attempts.
    pub error_detail: Option<String>,
}

impl DeliveryRecord {
    pub fn sent(id: i64) -> Self {
        Self {
            id,
            status: DeliveryStatus::Sent,
            error_detail: None,
        }
    }

    pub fn failed(id: i64, error: impl Into<String>) -> Self {
        Self {
            id,
            status: DeliveryStatus::Failed,
            error_detail: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_status_display() {
        assert_eq!(DeliveryStatus::Sent.to_string(), "sent");
        assert_eq!(DeliveryStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_delivery_record_constructors() {
        let sent = DeliveryRecord::sent(1);
        assert_eq!(sent.status, DeliveryStatus::Sent);
        assert!(sent.error_detail.is_none());

        let failed = DeliveryRecord::failed(2, "connection refused");
        assert_eq!(failed.status, DeliveryStatus::Failed);
        assert_eq!(failed.error_detail.as_deref(), Some("connection refused"));
    }
}
