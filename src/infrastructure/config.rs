//! Application configuration management.
//!
//! Configuration is loaded once at startup from environment variables
//! (with `.env` support via dotenvy). Missing or invalid values produce
//! clear errors instead of panics.

use std::env;
use std::num::ParseIntError;

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set.
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    InvalidValue {
        /// The name of the environment variable.
        key: String,
        /// Description of why the value is invalid.
        message: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvVar(key) => {
                write!(formatter, "Missing environment variable: {key}")
            }
            Self::InvalidValue { key, message } => {
                write!(formatter, "Invalid value for {key}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration.
///
/// # Environment Variables
///
/// - `TOKEN_KEY`: symmetric signing key for bearer tokens (required)
/// - `DATABASE_URL`: Postgres connection string (optional; when absent the
///   server runs against the in-memory store)
/// - `APP_HOST`: server host (optional, default `0.0.0.0`)
/// - `APP_PORT`: server port (optional, default 8081)
/// - `UPLOAD_LIMIT`: maximum request body size in bytes (optional, default 1000)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Postgres connection URL; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Symmetric key used to sign and verify bearer tokens.
    pub token_key: String,
    /// HTTP server host address.
    pub app_host: String,
    /// HTTP server port.
    pub app_port: u16,
    /// Maximum accepted request body size in bytes.
    pub upload_limit: u64,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `TOKEN_KEY` is not set and
    /// [`ConfigError::InvalidValue`] if a numeric variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors if file doesn't exist)
        dotenvy::dotenv().ok();

        let token_key = get_required_env("TOKEN_KEY")?;
        let database_url = env::var("DATABASE_URL").ok();
        let app_host = get_optional_env("APP_HOST", "0.0.0.0".to_string());
        let app_port = get_optional_env_parsed("APP_PORT", 8081)?;
        let upload_limit = get_optional_env_parsed("UPLOAD_LIMIT", 1000)?;

        Ok(Self {
            database_url,
            token_key,
            app_host,
            app_port,
            upload_limit,
        })
    }
}

impl Default for AppConfig {
    /// Development fallback: in-memory store, throwaway signing key.
    fn default() -> Self {
        Self {
            database_url: None,
            token_key: "insecure-development-key".to_string(),
            app_host: "127.0.0.1".to_string(),
            app_port: 8081,
            upload_limit: 1000,
        }
    }
}

/// Gets a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Gets an optional environment variable with a default value.
fn get_optional_env(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

/// Gets an optional environment variable and parses it, with a default value.
fn get_optional_env_parsed<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    env::var(key).map_or_else(
        |_| Ok(default),
        |value| {
            value
                .parse()
                .map_err(|error: ParseIntError| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: error.to_string(),
                })
        },
    )
}
