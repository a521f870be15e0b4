//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FOODMOOD_BACKEND_URL` - Base URL of the Food Mood backend API
//!   (e.g., `https://api.foodmood.app/api`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Local client storage directory (default: .foodmood)
//! - `CATALOG_CACHE_TTL_SECS` - Catalog response cache TTL (default: 300)
//! - `BACKEND_TIMEOUT_SECS` - Per-request backend timeout (default: 10)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
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
    /// Directory for local client storage (cart, recommendations, token)
    pub data_dir: PathBuf,
    /// Food Mood backend API configuration
    pub backend: BackendConfig,
}

/// Food Mood backend API configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend API (all endpoint paths are joined to this)
    pub base_url: Url,
    /// TTL for cached catalog responses
    pub catalog_cache_ttl: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
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

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let data_dir = PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", ".foodmood"));
        let backend = BackendConfig::from_env()?;

        Ok(Self {
            host,
            port,
            data_dir,
            backend,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_url_env("FOODMOOD_BACKEND_URL")?;
        let catalog_cache_ttl =
            Duration::from_secs(parse_u64_env("CATALOG_CACHE_TTL_SECS", "300")?);
        let request_timeout = Duration::from_secs(parse_u64_env("BACKEND_TIMEOUT_SECS", "10")?);

        Ok(Self {
            base_url,
            catalog_cache_ttl,
            request_timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a required environment variable as a URL.
fn parse_url_env(key: &str) -> Result<Url, ConfigError> {
    let raw = get_required_env(key)?;
    Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an optional environment variable as a u64 with a default.
fn parse_u64_env(key: &str, default: &str) -> Result<u64, ConfigError> {
    get_env_or_default(key, default)
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            data_dir: PathBuf::from(".foodmood"),
            backend: BackendConfig {
                base_url: Url::parse("http://localhost:8000/api").unwrap(),
                catalog_cache_ttl: Duration::from_secs(300),
                request_timeout: Duration::from_secs(10),
            },
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_backend_base_url_keeps_path() {
        let config = test_config();
        assert_eq!(config.backend.base_url.path(), "/api");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let err = Url::parse("not a url").unwrap_err();
        let config_err = ConfigError::InvalidEnvVar("FOODMOOD_BACKEND_URL".into(), err.to_string());
        assert!(config_err.to_string().contains("FOODMOOD_BACKEND_URL"));
    }
}
