//! Storefront configuration loaded from environment variables.
//!
//! Catalog contents, the booking link and the form endpoint id are NOT
//! configured here; they come from the catalog and settings feeds at
//! runtime. This module only says where those feeds live and how the
//! server binds.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Where the default feeds are fetched from
//!   (default: `http://{host}:{port}`)
//! - `STOREFRONT_TRUST_PROXY` - Take the client IP from `X-Forwarded-For`
//!   or `X-Real-IP` (default: false; only enable behind a proxy that
//!   overwrites them)
//! - `STOREFRONT_PUBLIC_DIR` - Directory holding `catalog.json` and
//!   `settings.json` (default: crates/storefront/public)
//! - `STOREFRONT_STATIC_DIR` - Directory served at `/static` (default:
//!   crates/storefront/static)
//! - `CATALOG_URL` - Catalog feed (default: `{base}/catalog.json`)
//! - `SETTINGS_URL` - Settings feed (default: `{base}/settings.json`)
//! - `FORMSPREE_ENDPOINT` - Form endpoint base (default: <https://formspree.io/f/>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default form endpoint base; the form id is appended as a path segment.
pub const DEFAULT_FORMSPREE_ENDPOINT: &str = "https://formspree.io/f/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
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
    /// Take client IPs from proxy headers
    pub trust_proxy: bool,
    /// Directory served at `/catalog.json` and `/settings.json`
    pub public_dir: PathBuf,
    /// Directory served at `/static`
    pub static_dir: PathBuf,
    /// Where the feeds and the form endpoint live
    pub feeds: FeedConfig,
    /// Sentry error tracking
    pub sentry: SentryConfig,
}

/// Runtime feed and third-party endpoint locations.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Catalog feed (JSON array of products)
    pub catalog_url: Url,
    /// Settings feed (JSON object)
    pub settings_url: Url,
    /// Base URL the form id is appended to
    pub formspree_endpoint: Url,
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
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

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1", |v| v.parse::<IpAddr>())?;
        let port = parse_env("STOREFRONT_PORT", "3000", |v| v.parse::<u16>())?;
        let base_url = get_optional_env("STOREFRONT_BASE_URL")
            .map_or_else(|| default_base_url(host, port), |v| parse_url("STOREFRONT_BASE_URL", &v))?;
        let trust_proxy = parse_env("STOREFRONT_TRUST_PROXY", "false", parse_flag)?;
        let public_dir = PathBuf::from(get_env_or_default(
            "STOREFRONT_PUBLIC_DIR",
            "crates/storefront/public",
        ));
        let static_dir = PathBuf::from(get_env_or_default(
            "STOREFRONT_STATIC_DIR",
            "crates/storefront/static",
        ));

        let feeds = FeedConfig::from_env(&base_url)?;
        let sentry = SentryConfig::from_env()?;

        Ok(Self {
            host,
            port,
            trust_proxy,
            public_dir,
            static_dir,
            feeds,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FeedConfig {
    fn from_env(base_url: &Url) -> Result<Self, ConfigError> {
        Ok(Self {
            catalog_url: url_env_or_join("CATALOG_URL", base_url, "catalog.json")?,
            settings_url: url_env_or_join("SETTINGS_URL", base_url, "settings.json")?,
            formspree_endpoint: parse_url(
                "FORMSPREE_ENDPOINT",
                &get_env_or_default("FORMSPREE_ENDPOINT", DEFAULT_FORMSPREE_ENDPOINT),
            )?,
        })
    }

    /// Feeds rooted at `base_url`, posting forms to the default endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the joined URLs are invalid.
    pub fn rooted_at(base_url: &Url) -> Result<Self, ConfigError> {
        Ok(Self {
            catalog_url: join_url("CATALOG_URL", base_url, "catalog.json")?,
            settings_url: join_url("SETTINGS_URL", base_url, "settings.json")?,
            formspree_endpoint: parse_url("FORMSPREE_ENDPOINT", DEFAULT_FORMSPREE_ENDPOINT)?,
        })
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN").filter(|v| !v.is_empty()),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0", |v| v.parse::<f32>())?,
            traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0", |v| {
                v.parse::<f32>()
            })?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) with `parse`.
fn parse_env<T, E: std::fmt::Display>(
    key: &str,
    default: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<T, ConfigError> {
    let value = get_env_or_default(key, default);
    parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`).
fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(format!("expected true or false, got '{other}'")),
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn default_base_url(host: IpAddr, port: u16) -> Result<Url, ConfigError> {
    parse_url(
        "STOREFRONT_BASE_URL",
        &format!("http://{}/", SocketAddr::new(host, port)),
    )
}

/// Join `path` onto `base`, treating the base as a directory.
fn join_url(key: &str, base: &Url, path: &str) -> Result<Url, ConfigError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn url_env_or_join(key: &str, base: &Url, path: &str) -> Result<Url, ConfigError> {
    get_optional_env(key).map_or_else(|| join_url(key, base, path), |v| parse_url(key, &v))
}
