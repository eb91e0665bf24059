//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Shopify (optional at startup, required per request)
//! - `SHOPIFY_STORE_DOMAIN` - Store domain (e.g., your-store.myshopify.com); falls back to `SHOP`
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token; falls back to `ADMIN_TOKEN`
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-01)
//! - `SHOPIFY_ADMIN_BASE_URL` - Override for the Admin API origin (default: `https://<store>`)
//!
//! Missing credentials do not stop the server: every request that needs
//! Shopify fails with a configuration error instead, so health checks and
//! memory-backed downloads keep working.
//!
//! ## Files
//! - `SKIP_SHOPIFY_FILES` - Store uploads in process memory instead of Shopify Files (default: false)
//! - `MEMORY_STORE_TTL_SECS` - Lifetime of memory-stored files (default: 86400)
//! - `MEMORY_STORE_MAX_BYTES` - Total bytes kept in memory (default: 256 MiB)
//!
//! ## Server
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 3000)
//! - `MAX_BODY_BYTES` - Request body limit (default: 50 MiB)
//! - `CORS_ALLOWED_ORIGINS` - Comma-separated origins; empty allows any origin
//! - `APP_ENVIRONMENT` - Reported by `/api/health` (default: development)
//!
//! ## Optional (Sentry)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_API_VERSION: &str = "2024-01";
const DEFAULT_MEMORY_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_MEMORY_MAX_BYTES: u64 = 256 * 1024 * 1024;
const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &["your-", "changeme", "replace", "placeholder", "xxx"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment label
    pub environment: String,
    /// Shopify Admin API configuration
    pub shopify: ShopifyConfig,
    /// Upload storage configuration
    pub files: FileConfig,
    /// Origins allowed by CORS (empty = any)
    pub cors_allowed_origins: Vec<String>,
    /// Maximum accepted request body size
    pub max_body_bytes: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: Option<String>,
    /// Admin API access token
    pub access_token: Option<SecretString>,
    /// Shopify API version (e.g., 2024-01)
    pub api_version: String,
    /// Admin API origin override
    pub admin_base_url: Option<Url>,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_version", &self.api_version)
            .field("admin_base_url", &self.admin_base_url)
            .finish()
    }
}

impl ShopifyConfig {
    /// GraphQL endpoint for the configured store, if both store and token are set.
    #[must_use]
    pub fn graphql_endpoint(&self) -> Option<String> {
        self.access_token.as_ref()?;

        let origin = match (&self.admin_base_url, &self.store) {
            (Some(base), _) => base.as_str().trim_end_matches('/').to_string(),
            (None, Some(store)) => format!("https://{store}"),
            (None, None) => return None,
        };

        Some(format!(
            "{origin}/admin/api/{}/graphql.json",
            self.api_version
        ))
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store = first_present(lookup, &["SHOPIFY_STORE_DOMAIN", "SHOP"]);
        let access_token = first_present(lookup, &["SHOPIFY_ACCESS_TOKEN", "ADMIN_TOKEN"]);

        if let Some(token) = &access_token
            && let Some(pattern) = placeholder_pattern(token)
        {
            tracing::warn!("SHOPIFY_ACCESS_TOKEN looks like a placeholder (contains '{pattern}')");
        }

        let admin_base_url = lookup("SHOPIFY_ADMIN_BASE_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("SHOPIFY_ADMIN_BASE_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            store,
            access_token: access_token.map(SecretString::from),
            api_version: lookup("SHOPIFY_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            admin_base_url,
        })
    }
}

/// Upload storage configuration.
#[derive(Debug, Clone)]
pub struct FileConfig {
    /// Keep uploads in memory instead of sending them to Shopify Files
    pub skip_shopify_files: bool,
    /// How long memory-stored files live
    pub memory_ttl: Duration,
    /// Upper bound on bytes held by the memory store
    pub memory_max_bytes: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            skip_shopify_files: false,
            memory_ttl: Duration::from_secs(DEFAULT_MEMORY_TTL_SECS),
            memory_max_bytes: DEFAULT_MEMORY_MAX_BYTES,
        }
    }
}

impl FileConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let skip_shopify_files = lookup("SKIP_SHOPIFY_FILES")
            .map(|v| parse_bool("SKIP_SHOPIFY_FILES", &v))
            .transpose()?
            .unwrap_or(false);

        let ttl_secs = parse_or("MEMORY_STORE_TTL_SECS", lookup, DEFAULT_MEMORY_TTL_SECS)?;
        let memory_max_bytes = parse_or("MEMORY_STORE_MAX_BYTES", lookup, DEFAULT_MEMORY_MAX_BYTES)?;

        Ok(Self {
            skip_shopify_files,
            memory_ttl: Duration::from_secs(ttl_secs),
            memory_max_bytes,
        })
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;

        let port = parse_or("PORT", &lookup, 3000_u16)?;
        let max_body_bytes = parse_or("MAX_BODY_BYTES", &lookup, DEFAULT_MAX_BODY_BYTES)?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let sentry_sample_rate = lookup("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = lookup("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            environment: lookup("APP_ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            shopify: ShopifyConfig::from_lookup(&lookup)?,
            files: FileConfig::from_lookup(&lookup)?,
            cors_allowed_origins,
            max_body_bytes,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Return the first variable in `keys` that is set and non-empty.
fn first_present(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| lookup(key))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Parse a variable, falling back to `default` when it is unset.
fn parse_or<T>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn placeholder_pattern(secret: &str) -> Option<&'static str> {
    let lower = secret.to_lowercase();
    PLACEHOLDER_PATTERNS
        .iter()
        .copied()
        .find(|pattern| lower.contains(pattern))
}

/// Whether the access token is present, without exposing it.
#[must_use]
pub fn has_access_token(config: &ShopifyConfig) -> bool {
    config
        .access_token
        .as_ref()
        .is_some_and(|t| !t.expose_secret().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.shopify.api_version, "2024-01");
        assert!(config.shopify.store.is_none());
        assert!(config.shopify.graphql_endpoint().is_none());
        assert!(!config.files.skip_shopify_files);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_shopify_fallback_variables() {
        let config = load(&[("SHOP", "demo.myshopify.com"), ("ADMIN_TOKEN", "shpat_abc")]).unwrap();
        assert_eq!(
            config.shopify.graphql_endpoint().as_deref(),
            Some("https://demo.myshopify.com/admin/api/2024-01/graphql.json")
        );
        assert!(has_access_token(&config.shopify));
    }

    #[test]
    fn test_primary_variables_win() {
        let config = load(&[
            ("SHOPIFY_STORE_DOMAIN", "primary.myshopify.com"),
            ("SHOP", "fallback.myshopify.com"),
            ("SHOPIFY_ACCESS_TOKEN", "shpat_primary"),
        ])
        .unwrap();
        assert_eq!(
            config.shopify.store.as_deref(),
            Some("primary.myshopify.com")
        );
    }

    #[test]
    fn test_endpoint_requires_token() {
        let config = load(&[("SHOPIFY_STORE_DOMAIN", "demo.myshopify.com")]).unwrap();
        assert!(config.shopify.graphql_endpoint().is_none());
    }

    #[test]
    fn test_base_url_override() {
        let config = load(&[
            ("SHOPIFY_ADMIN_BASE_URL", "http://127.0.0.1:9000/"),
            ("SHOPIFY_ACCESS_TOKEN", "shpat_abc"),
            ("SHOPIFY_API_VERSION", "2025-01"),
        ])
        .unwrap();
        assert_eq!(
            config.shopify.graphql_endpoint().as_deref(),
            Some("http://127.0.0.1:9000/admin/api/2025-01/graphql.json")
        );
    }

    #[test]
    fn test_skip_shopify_files() {
        assert!(
            load(&[("SKIP_SHOPIFY_FILES", "true")])
                .unwrap()
                .files
                .skip_shopify_files
        );
        assert!(
            !load(&[("SKIP_SHOPIFY_FILES", "false")])
                .unwrap()
                .files
                .skip_shopify_files
        );
        assert!(load(&[("SKIP_SHOPIFY_FILES", "maybe")]).is_err());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "PORT"));
    }

    #[test]
    fn test_cors_origins() {
        let config = load(&[(
            "CORS_ALLOWED_ORIGINS",
            "https://shop.example.com, http://localhost:3000,,",
        )])
        .unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://shop.example.com", "http://localhost:3000"]
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = load(&[("SHOPIFY_ACCESS_TOKEN", "shpat_secret_value")]).unwrap();
        let debug = format!("{:?}", config.shopify);
        assert!(!debug.contains("shpat_secret_value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_placeholder_detection() {
        assert_eq!(placeholder_pattern("your-token-here"), Some("your-"));
        assert_eq!(placeholder_pattern("shpat_1f2e3d"), None);
    }

    #[test]
    fn test_socket_addr() {
        let config = load(&[("HOST", "127.0.0.1"), ("PORT", "8080")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }
}
