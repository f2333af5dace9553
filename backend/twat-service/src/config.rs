/// Configuration management for Twat Service
///
/// Loads configuration from environment variables (a `.env` file is honoured by `main`).
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use session_auth::DEFAULT_SESSION_COOKIES;

pub const DEFAULT_IMAGEKIT_UPLOAD_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Media upload configuration
    pub imagekit: ImageKitConfig,
    /// Session cookie configuration
    pub session: SessionConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

/// ImageKit upload configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ImageKitConfig {
    pub private_key: String,
    pub public_key: Option<String>,
    pub url_endpoint: Option<String>,
    pub upload_url: String,
    pub folder: Option<String>,
    #[serde(default = "default_upload_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ImageKitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageKitConfig")
            .field("private_key", &"[REDACTED]")
            .field("public_key", &self.public_key)
            .field("url_endpoint", &self.url_endpoint)
            .field("upload_url", &self.upload_url)
            .field("folder", &self.folder)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_names: Vec<String>,
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

fn default_upload_timeout_secs() -> u64 {
    30
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT").unwrap_or(8080),
        };

        let allowed_origins = match env_non_empty("CORS_ALLOWED_ORIGINS") {
            Some(value) => value,
            None if app.is_production() => {
                bail!("CORS_ALLOWED_ORIGINS must be set in production")
            }
            None => "http://localhost:3000".to_string(),
        };
        if app.is_production() && allowed_origins.trim() == "*" {
            bail!("CORS_ALLOWED_ORIGINS cannot be '*' in production");
        }

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .context("DATABASE_URL environment variable not set")?,
            max_connections: env_parse("DB_MAX_CONNECTIONS")
                .unwrap_or_else(default_max_connections),
            min_connections: env_parse("DB_MIN_CONNECTIONS")
                .unwrap_or_else(default_min_connections),
            acquire_timeout_secs: env_parse("DB_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(default_acquire_timeout_secs),
        };

        let imagekit = ImageKitConfig {
            private_key: env_non_empty("IMAGEKIT_PRIVATE_KEY")
                .context("IMAGEKIT_PRIVATE_KEY environment variable not set")?,
            public_key: env_non_empty("IMAGEKIT_PUBLIC_KEY"),
            url_endpoint: env_non_empty("IMAGEKIT_URL_ENDPOINT"),
            upload_url: env_non_empty("IMAGEKIT_UPLOAD_URL")
                .unwrap_or_else(|| DEFAULT_IMAGEKIT_UPLOAD_URL.to_string()),
            folder: env_non_empty("IMAGEKIT_FOLDER"),
            timeout_secs: env_parse("IMAGEKIT_TIMEOUT_SECS")
                .unwrap_or_else(default_upload_timeout_secs),
        };

        let cookie_names = match env_non_empty("SESSION_COOKIE_NAMES") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_SESSION_COOKIES.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Config {
            app,
            cors: CorsConfig { allowed_origins },
            database,
            imagekit,
            session: SessionConfig { cookie_names },
        })
    }
}
