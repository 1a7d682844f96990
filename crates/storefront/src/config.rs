//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_API_BASE_URL` - Base URL of the remote catalog API
//!   (e.g., `https://catalog.example.com/v2`)
//! - `CATALOG_API_PATH` - Shop path segment under `/api/`
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CATALOG_API_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `CATALOG_CACHE_TTL_SECS` - Product cache TTL, 0 disables (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Remote catalog API configuration
    pub catalog: CatalogApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Remote catalog API configuration.
///
/// Implements `Debug` manually so the shop path, which acts as the shop's
/// key on the shared API, is not written to logs.
#[derive(Clone)]
pub struct CatalogApiConfig {
    /// Base URL, without the `/api/{path}` suffix
    pub base_url: Url,
    /// Shop path segment
    pub api_path: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long product listings and details are cached
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for CatalogApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_path", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let catalog = CatalogApiConfig::from_env()?;

        Ok(Self {
            host,
            port,
            catalog,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_sample_rate("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_sample_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogApiConfig {
    /// Default per-request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
    /// Default product cache TTL in seconds.
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

    /// Load the catalog API settings from the environment.
    ///
    /// Shared with the CLI, which reads the same variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL or path is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("CATALOG_API_BASE_URL")?;
        let api_path = get_required_env("CATALOG_API_PATH")?;
        let timeout = parse_env_or_default::<u64>(
            "CATALOG_API_TIMEOUT_SECS",
            &Self::DEFAULT_TIMEOUT_SECS.to_string(),
        )?;
        let cache_ttl = parse_env_or_default::<u64>(
            "CATALOG_CACHE_TTL_SECS",
            &Self::DEFAULT_CACHE_TTL_SECS.to_string(),
        )?;

        Self::new(
            &base_url,
            &api_path,
            Duration::from_secs(timeout),
            Duration::from_secs(cache_ttl),
        )
    }

    /// Build and validate a catalog configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the base URL is not an
    /// absolute http(s) URL or the path is empty or contains `/`.
    pub fn new(
        base_url: &str,
        api_path: &str,
        timeout: Duration,
        cache_ttl: Duration,
    ) -> Result<Self, ConfigError> {
        let base_url = validate_base_url(base_url)?;
        let api_path = validate_api_path(api_path)?;

        Ok(Self {
            base_url,
            api_path,
            timeout,
            cache_ttl,
        })
    }

    /// The API root: `{base_url}/api/{api_path}`.
    #[must_use]
    pub fn api_root(&self) -> Url {
        let mut url = self.base_url.clone();
        // http(s) URLs always have a path to extend
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", self.api_path.as_str()]);
        }
        url
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate in `0.0..=1.0`.
fn parse_sample_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate = parse_env_or_default::<f32>(key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

fn validate_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        ConfigError::InvalidEnvVar("CATALOG_API_BASE_URL".to_string(), e.to_string())
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "CATALOG_API_BASE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidEnvVar(
            "CATALOG_API_BASE_URL".to_string(),
            "must not contain a query or fragment".to_string(),
        ));
    }

    Ok(url)
}

fn validate_api_path(raw: &str) -> Result<String, ConfigError> {
    let path = raw.trim();
    if path.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            "CATALOG_API_PATH".to_string(),
            "must not be empty".to_string(),
        ));
    }
    if path.contains('/') {
        return Err(ConfigError::InvalidEnvVar(
            "CATALOG_API_PATH".to_string(),
            "must be a single path segment".to_string(),
        ));
    }
    Ok(path.to_string())
}
