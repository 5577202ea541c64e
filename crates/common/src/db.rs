use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::config::AppConfig;

/// Create a PostgreSQL connection pool from the configured host/name/user
/// parts.
///
/// `AppConfig::db_max_connections` controls the maximum number of connections
/// in the pool (default 5).
pub async fn create_pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    let options = PgConnectOptions::new()
        .host(&config.db_host)
        .database(&config.db_name)
        .username(&config.db_user)
        .password(&config.db_password);

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_with(options)
        .await?;

    tracing::info!(
        host = %config.db_host,
        database = %config.db_name,
        max_connections = config.db_max_connections,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}
