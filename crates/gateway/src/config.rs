//! Gateway configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `PORT` - Listen port (default: 3000)
//! - `GATEWAY_HOST` - Bind address (default: 0.0.0.0)
//! - `MONGODB_URI` - MongoDB connection string (default: mongodb://localhost:27017)
//! - `MONGODB_DATABASE` - Database name (default: Webstore)
//! - `ACTIVITY_LOG_PATH` - Activity log file (default: project.log)
//! - `STATIC_DIR` - Directory served at `/static` (default: static)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_PORT: &str = "3000";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "Webstore";
const DEFAULT_ACTIVITY_LOG: &str = "project.log";
const DEFAULT_STATIC_DIR: &str = "static";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Gateway application configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// MongoDB connection string (may contain credentials)
    pub database_url: SecretString,
    /// Database holding every collection the gateway exposes
    pub database_name: String,
    /// Append-only activity log file
    pub activity_log_path: PathBuf,
    /// Directory of static assets
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var_or("GATEWAY_HOST", DEFAULT_HOST)
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GATEWAY_HOST".to_string(), e.to_string()))?;
        let port = var_or("PORT", DEFAULT_PORT)
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let database_name = var_or("MONGODB_DATABASE", DEFAULT_DATABASE);
        if database_name.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "MONGODB_DATABASE".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            database_url: SecretString::from(var_or("MONGODB_URI", DEFAULT_MONGODB_URI)),
            database_name,
            activity_log_path: PathBuf::from(var_or("ACTIVITY_LOG_PATH", DEFAULT_ACTIVITY_LOG)),
            static_dir: PathBuf::from(var_or("STATIC_DIR", DEFAULT_STATIC_DIR)),
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
