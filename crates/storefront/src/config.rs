//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (checkout returns here)
//! - `STRIPE_SECRET_KEY` - Stripe secret API key (server-side only)
//! - `STRIPE_PUBLISHABLE_KEY` - Stripe publishable key (safe to expose in browser)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STRIPE_API_BASE` - API root (default: <https://api.stripe.com>)
//! - `STRIPE_API_VERSION` - Pinned API version (default: 2020-08-27)
//! - `STRIPE_CATALOG_LIMIT` - Prices shown on the storefront, 1-100 (default: 10)
//! - `STRIPE_PAYMENT_METHOD_TYPES` - Comma-separated list (default: card)
//! - `STRIPE_TIMEOUT_SECS` - Outbound request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use price_cart_core::PaymentMethodType;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MAX_CATALOG_LIMIT: u8 = 100;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Stripe API configuration
    pub stripe: StripeConfig,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Stripe API configuration.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct StripeConfig {
    /// API root, overridable for tests and proxies
    pub api_base: Url,
    /// Pinned API version sent as `Stripe-Version`
    pub api_version: String,
    /// Secret API key (server-side only)
    pub secret_key: SecretString,
    /// Publishable key (used by Stripe.js on the checkout hand-off page)
    pub publishable_key: String,
    /// Number of active prices listed on the storefront
    pub catalog_limit: u8,
    /// Payment methods offered on the hosted checkout page
    pub payment_method_types: Vec<PaymentMethodType>,
    /// Timeout for each outbound request
    pub timeout: Duration,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_base", &self.api_base.as_str())
            .field("api_version", &self.api_version)
            .field("secret_key", &"[REDACTED]")
            .field("publishable_key", &self.publishable_key)
            .field("catalog_limit", &self.catalog_limit)
            .field("payment_method_types", &self.payment_method_types)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Sentry DSN; tracking is disabled when absent
    pub dsn: Option<String>,
    /// Environment name reported with events
    pub environment: Option<String>,
    /// Error event sample rate
    pub sample_rate: f32,
    /// Performance trace sample rate
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let base_url = parse_url("STOREFRONT_BASE_URL", &get_required_env("STOREFRONT_BASE_URL")?)?;

        let stripe = StripeConfig::from_env()?;
        let sentry = SentryConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            stripe,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Absolute URL of a storefront page, used as the checkout return URL.
    #[must_use]
    pub fn page_url(&self, path: &str) -> String {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_or_else(|_| self.base_url.to_string(), String::from)
    }
}

impl StripeConfig {
    /// Load only the Stripe settings (used by the CLI as well).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a key is missing, a value does not parse, or
    /// the secret key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let api_base = parse_url(
            "STRIPE_API_BASE",
            &get_env_or_default("STRIPE_API_BASE", "https://api.stripe.com"),
        )?;

        let catalog_limit: u8 = parse_env("STRIPE_CATALOG_LIMIT", "10")?;
        if catalog_limit == 0 || catalog_limit > MAX_CATALOG_LIMIT {
            return Err(ConfigError::InvalidEnvVar(
                "STRIPE_CATALOG_LIMIT".to_string(),
                format!("must be between 1 and {MAX_CATALOG_LIMIT}"),
            ));
        }

        let payment_method_types = parse_payment_methods(&get_env_or_default(
            "STRIPE_PAYMENT_METHOD_TYPES",
            "card",
        ))?;

        let timeout_secs: u64 = parse_env("STRIPE_TIMEOUT_SECS", "30")?;

        Ok(Self {
            api_base,
            api_version: get_env_or_default("STRIPE_API_VERSION", "2020-08-27"),
            secret_key: get_validated_secret("STRIPE_SECRET_KEY")?,
            publishable_key: get_required_env("STRIPE_PUBLISHABLE_KEY")?,
            catalog_limit,
            payment_method_types,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
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

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an absolute http(s) URL.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse a comma-separated payment method list.
fn parse_payment_methods(value: &str) -> Result<Vec<PaymentMethodType>, ConfigError> {
    let methods = value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse::<PaymentMethodType>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ConfigError::InvalidEnvVar("STRIPE_PAYMENT_METHOD_TYPES".to_string(), e))?;

    if methods.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            "STRIPE_PAYMENT_METHOD_TYPES".to_string(),
            "at least one payment method is required".to_string(),
        ));
    }
    Ok(methods)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key from the Stripe dashboard."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
