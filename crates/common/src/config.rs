use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL server hostname
    pub db_host: String,

    /// PostgreSQL database name
    pub db_name: String,

    /// PostgreSQL user
    pub db_user: String,

    /// PostgreSQL password (empty string = no password)
    pub db_password: String,

    /// SMTP relay hostname
    pub smtp_host: String,

    /// SMTP relay port (default: 25)
    pub smtp_port: u16,

    /// SMTP username; authentication is skipped when unset
    pub smtp_user: Option<String>,

    /// SMTP password, paired with `smtp_user`
    pub smtp_password: String,

    /// Email sender address
    pub email_from: String,

    /// Recipient address(es), comma-separated
    pub email_to: String,

    /// Maximum number of PostgreSQL connections in the pool (default: 5)
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Tests inject a
    /// map here instead of mutating the process environment.
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            db_host: var("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            db_name: var("DB_NAME").unwrap_or_else(|| "postgres".to_string()),
            db_user: var("DB_USER").unwrap_or_else(|| "postgres".to_string()),
            db_password: var("DB_PASS").unwrap_or_default(),
            smtp_host: var("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
            smtp_port: var("SMTP_PORT")
                .unwrap_or_else(|| "25".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SMTP_PORT must be a valid u16"))?,
            smtp_user: var("SMTP_USER").filter(|u| !u.is_empty()),
            smtp_password: var("SMTP_PASS").unwrap_or_default(),
            email_from: var("EMAIL_FROM").unwrap_or_else(|| "monitor@example.com".to_string()),
            email_to: var("EMAIL_TO").unwrap_or_else(|| "ops@example.com".to_string()),
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
        })
    }

    /// Split `email_to` into individual recipient addresses.
    ///
    /// Whitespace around each address is trimmed; empty segments (e.g. a
    /// trailing comma) are skipped.
    pub fn recipients(&self) -> Vec<&str> {
        self.email_to
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
