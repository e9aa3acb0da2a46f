use std::time::Duration;

use anyhow::{Context, Result};

use crate::export::retry::RetryPolicy;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub export_max_attempts: u32,
    pub export_retry_delay_ms: u64,
    /// Present only when `EXPORT_PERSIST` is enabled.
    pub storage: Option<StorageConfig>,
}

/// S3 / MinIO settings for persisting exported PDFs.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let persist = parse_env("EXPORT_PERSIST", false)?;
        let storage = if persist {
            Some(StorageConfig {
                s3_bucket: require_env("S3_BUCKET")?,
                s3_endpoint: require_env("S3_ENDPOINT")?,
                aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            })
        } else {
            None
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            export_max_attempts: parse_env("EXPORT_MAX_ATTEMPTS", 3)?,
            export_retry_delay_ms: parse_env("EXPORT_RETRY_DELAY_MS", 1000)?,
            storage,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.export_max_attempts,
            Duration::from_millis(self.export_retry_delay_ms),
        )
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
