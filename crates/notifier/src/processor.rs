//! The poll-send-update loop.
//!
//! Fetches all unprocessed rows from `monitoring.log_email`, attempts
//! delivery for each in event-timestamp order, and flags successes as
//! processed. A delivery failure leaves the row pending and the loop moves
//! on; a database error aborts the run.

use sqlx::PgPool;

use courier_common::error::AppError;
use courier_common::types::{DeliveryRecord, EmailLogEntry};

use crate::mailer::Mailer;

/// Notifier that drains the pending alert emails once per invocation.
pub struct Notifier<M> {
    pool: PgPool,
    mailer: M,
}

impl<M: Mailer + Sync> Notifier<M> {
    pub fn new(pool: PgPool, mailer: M) -> Self {
        Self { pool, mailer }
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Run one pass: fetch pending entries, send each, mark successes.
    ///
    /// At-least-once semantics: a crash between a successful send and the
    /// processed-flag update re-delivers that entry on the next run.
    pub async fn process_pending(&self) -> Result<Vec<DeliveryRecord>, AppError> {
        let entries = self.fetch_pending().await?;

        if entries.is_empty() {
            tracing::info!("No pending alert emails");
            return Ok(Vec::new());
        }

        tracing::info!(pending = entries.len(), "Fetched pending alert emails");

        let mut records = Vec::with_capacity(entries.len());
        for entry in &entries {
            match self.mailer.send(&entry.subject, &entry.body_html).await {
                Ok(()) => {
                    self.mark_processed(entry.id).await?;
                    tracing::info!(id = entry.id, subject = %entry.subject, "Alert email sent");
                    records.push(DeliveryRecord::sent(entry.id));
                }
                Err(e) => {
                    // Row stays pending; it is retried on the next run.
                    tracing::warn!(id = entry.id, error = %e, "Failed to send alert email");
                    records.push(DeliveryRecord::failed(entry.id, e.to_string()));
                }
            }
        }

        Ok(records)
    }

    /// Fetch all unprocessed entries, oldest alert first.
    pub async fn fetch_pending(&self) -> Result<Vec<EmailLogEntry>, AppError> {
        let entries = sqlx::query_as::<_, EmailLogEntry>(
            r#"
            SELECT id_email AS id,
                   assunto AS subject,
                   corpo_html AS body_html,
                   data_evento AS event_timestamp,
                   processed
            FROM monitoring.log_email
            WHERE processed = false
            ORDER BY data_evento ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Flag a single entry as delivered.
    pub async fn mark_processed(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE monitoring.log_email SET processed = true WHERE id_email = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
