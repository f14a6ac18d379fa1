//! Application configuration loaded from the environment.

use anyhow::{Context, Result};

use crate::constants::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_SHARE_LINK_TTL_DAYS,
};

/// Blob storage backend selection.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Filesystem-backed storage rooted at `root`, serving blobs under `base_url`.
    Local { root: String, base_url: String },
    /// S3 (or S3-compatible) bucket.
    S3 {
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    },
}

/// SMTP settings for the invalidation mailer.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Base URL used to build share-link upload URLs sent by email.
    pub public_base_url: String,
    pub storage: StorageConfig,
    pub smtp: Option<SmtpConfig>,
    pub share_link_ttl_days: i64,
    pub fetch_timeout_secs: u64,
    pub max_upload_size: usize,
}

impl Config {
    /// Load configuration from environment variables (honoring a `.env` file).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", host, port));

        let storage = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .as_str()
        {
            "s3" => StorageConfig::S3 {
                bucket: std::env::var("S3_BUCKET")
                    .context("S3_BUCKET must be set when STORAGE_BACKEND=s3")?,
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
                endpoint_url: std::env::var("S3_ENDPOINT_URL").ok(),
            },
            _ => StorageConfig::Local {
                root: std::env::var("STORAGE_LOCAL_ROOT")
                    .unwrap_or_else(|_| "./data/blobs".to_string()),
                base_url: std::env::var("STORAGE_LOCAL_BASE_URL")
                    .unwrap_or_else(|_| format!("{}/blobs", public_base_url)),
            },
        };

        let smtp = match std::env::var("SMTP_HOST") {
            Ok(smtp_host) => Some(SmtpConfig {
                host: smtp_host,
                port: std::env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse::<u16>()
                    .context("SMTP_PORT must be a valid port number")?,
                username: std::env::var("SMTP_USERNAME").ok(),
                password: std::env::var("SMTP_PASSWORD").ok(),
                from: std::env::var("SMTP_FROM")
                    .unwrap_or_else(|_| "no-reply@documo.local".to_string()),
            }),
            Err(_) => None,
        };

        let share_link_ttl_days = std::env::var("SHARE_LINK_TTL_DAYS")
            .ok()
            .map(|v| v.parse::<i64>())
            .transpose()
            .context("SHARE_LINK_TTL_DAYS must be an integer")?
            .unwrap_or(DEFAULT_SHARE_LINK_TTL_DAYS);

        let fetch_timeout_secs = std::env::var("FETCH_TIMEOUT_SECS")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("FETCH_TIMEOUT_SECS must be an integer")?
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("MAX_UPLOAD_SIZE must be an integer")?
            .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE);

        Ok(Config {
            database_url,
            host,
            port,
            public_base_url,
            storage,
            smtp,
            share_link_ttl_days,
            fetch_timeout_secs,
            max_upload_size,
        })
    }
}
