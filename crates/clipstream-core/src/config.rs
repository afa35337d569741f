//! Configuration module
//!
//! This module provides the configuration structure for the API service:
//! server, database, CDN signing keys, and upload policy settings, all read
//! from the environment.

use std::env;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Base server configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
}

/// Clipstream service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // CDN upload authorization. The private key signs upload tokens and is
    // never sent to clients; the public key identifies the account at the CDN.
    // Both are optional at startup and checked at token-issuance time.
    pub cdn_private_key: Option<String>,
    pub cdn_public_key: Option<String>,
    pub cdn_upload_url: String,
    pub upload_token_ttl_secs: i64,
    // Upload policy
    pub max_video_size_bytes: usize,
    pub max_image_size_bytes: usize,
    pub video_allowed_content_types: Vec<String>,
    pub image_allowed_content_types: Vec<String>,
    pub upload_timeout_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn cdn_private_key(&self) -> Option<&str> {
        self.inner().cdn_private_key.as_deref()
    }

    pub fn cdn_public_key(&self) -> Option<&str> {
        self.inner().cdn_public_key.as_deref()
    }

    pub fn cdn_upload_url(&self) -> &str {
        &self.inner().cdn_upload_url
    }

    pub fn upload_token_ttl_secs(&self) -> i64 {
        self.inner().upload_token_ttl_secs
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.inner().max_video_size_bytes
    }

    pub fn max_image_size_bytes(&self) -> usize {
        self.inner().max_image_size_bytes
    }

    pub fn video_allowed_content_types(&self) -> &[String] {
        &self.inner().video_allowed_content_types
    }

    pub fn image_allowed_content_types(&self) -> &[String] {
        &self.inner().image_allowed_content_types
    }

    pub fn upload_timeout_secs(&self) -> u64 {
        self.inner().upload_timeout_secs
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        const MAX_VIDEO_SIZE_MB: usize = 100;
        const MAX_IMAGE_SIZE_MB: usize = 5;
        const UPLOAD_TOKEN_TTL_SECS: i64 = 2400;
        const UPLOAD_TIMEOUT_SECS: u64 = 300;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4100".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
        };

        let config = ServiceConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            cdn_private_key: env::var("CDN_PRIVATE_KEY").ok().filter(|s| !s.is_empty()),
            cdn_public_key: env::var("CDN_PUBLIC_KEY").ok().filter(|s| !s.is_empty()),
            cdn_upload_url: env::var("CDN_UPLOAD_URL")
                .unwrap_or_else(|_| "https://upload.imagekit.io/api/v1/files/upload".to_string()),
            upload_token_ttl_secs: env::var("UPLOAD_TOKEN_TTL_SECS")
                .unwrap_or_else(|_| UPLOAD_TOKEN_TTL_SECS.to_string())
                .parse()
                .unwrap_or(UPLOAD_TOKEN_TTL_SECS),
            max_video_size_bytes: env::var("MAX_VIDEO_SIZE_MB")
                .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_VIDEO_SIZE_MB)
                * 1024
                * 1024,
            max_image_size_bytes: env::var("MAX_IMAGE_SIZE_MB")
                .unwrap_or_else(|_| MAX_IMAGE_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_IMAGE_SIZE_MB)
                * 1024
                * 1024,
            video_allowed_content_types: env::var("VIDEO_ALLOWED_CONTENT_TYPES")
                .unwrap_or_else(|_| {
                    "video/mp4,video/quicktime,video/x-msvideo,video/x-ms-wmv".to_string()
                })
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .collect(),
            image_allowed_content_types: env::var("IMAGE_ALLOWED_CONTENT_TYPES")
                .unwrap_or_else(|_| "image/jpeg,image/png,image/webp".to_string())
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .collect(),
            upload_timeout_secs: env::var("UPLOAD_TIMEOUT_SECS")
                .unwrap_or_else(|_| UPLOAD_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(UPLOAD_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.upload_token_ttl_secs <= 0 {
            return Err(anyhow::anyhow!(
                "UPLOAD_TOKEN_TTL_SECS must be greater than zero"
            ));
        }

        if self.cdn_upload_url.is_empty() {
            return Err(anyhow::anyhow!("CDN_UPLOAD_URL cannot be empty"));
        }

        Ok(())
    }
}
