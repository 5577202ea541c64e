use courier_common::config::AppConfig;
use courier_common::db;
use courier_common::error::AppError;
use courier_common::types::DeliveryStatus;
use courier_notifier::mailer::SmtpMailer;
use courier_notifier::processor::Notifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier_notifier=info,courier_common=info".into()),
        )
        .json()
        .init();

    tracing::info!("AlertCourier Notifier starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // A bad sender or recipient address fails the run before anything is sent
    let mailer = SmtpMailer::from_config(&config)
        .map_err(|e| AppError::Config(format!("invalid sender or recipient address: {e}")))?;

    // Connect to database
    let pool = db::create_pool(&config).await?;

    let notifier = Notifier::new(pool.clone(), mailer);
    let result = notifier.process_pending().await;

    // Release the pool on all exit paths, including a failed run
    pool.close().await;

    let records = result?;
    let sent = records
        .iter()
        .filter(|r| r.status == DeliveryStatus::Sent)
        .count();
    let failed = records.len() - sent;

    tracing::info!(sent, failed, "AlertCourier Notifier finished.");
    Ok(())
}
