//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_DATABASE_URL` - Realtime database base URL. When unset the
//!   storefront runs against an in-memory product store
//! - `STOREFRONT_DATABASE_SECRET` - Database auth token (high entropy)
//! - `STOREFRONT_POLL_INTERVAL_MS` - Product poll interval (default: 2000)
//! - `STOREFRONT_NOTIFICATION_MS` - Banner lifetime (default: 3000)
//! - `STOREFRONT_STATE_DIR` - Directory for local storage (default: .valentina)
//! - `SHOP_NAME` - Shop name used in messages and receipts (default: Frappés Valentina)
//! - `SHOP_WHATSAPP_NUMBER` - Order/reservation recipient (default: 59174420831)
//! - `SHOP_CURRENCY` - Currency prefix for prices (default: Bs)

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote product store, `None` for the in-memory store
    pub remote: Option<RemoteConfig>,
    /// Directory holding the local key/value storage file
    pub state_dir: PathBuf,
    /// How long a notification banner stays up
    pub notification_ttl: Duration,
    /// Shop identity used in messages and receipts
    pub shop: ShopSettings,
}

/// Realtime database connection settings.
///
/// Implements `Debug` manually to redact the auth token.
#[derive(Clone)]
pub struct RemoteConfig {
    /// Database base URL (e.g. `https://<db>.firebaseio.com`)
    pub url: Url,
    /// Optional auth token appended as `?auth=`
    pub secret: Option<SecretString>,
    /// Interval between product polls
    pub poll_interval: Duration,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url.as_str())
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

/// Shop identity shown to shoppers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopSettings {
    /// Shop name (e.g. "Frappés Valentina")
    pub name: String,
    /// Messaging recipient, digits only with country code
    pub whatsapp_number: String,
    /// Currency prefix for prices (e.g. "Bs")
    pub currency: String,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            name: "Frappés Valentina".to_string(),
            whatsapp_number: "59174420831".to_string(),
            currency: "Bs".to_string(),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            remote: None,
            state_dir: PathBuf::from(".valentina"),
            notification_ttl: Duration::from_millis(3000),
            shop: ShopSettings::default(),
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
    /// Returns `ConfigError` if a variable is invalid or the database secret
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let remote = RemoteConfig::from_env()?;
        let state_dir = PathBuf::from(get_env_or_default("STOREFRONT_STATE_DIR", ".valentina"));
        let notification_ttl = get_millis("STOREFRONT_NOTIFICATION_MS", 3000)?;
        let shop = ShopSettings::from_env()?;

        Ok(Self {
            remote,
            state_dir,
            notification_ttl,
            shop,
        })
    }

    /// Path of the local storage file inside the state directory.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.state_dir.join("storage.json")
    }
}

impl RemoteConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(raw_url) = get_optional_env("STOREFRONT_DATABASE_URL") else {
            return Ok(None);
        };
        let url = parse_database_url(&raw_url)?;

        let secret = match get_optional_env("STOREFRONT_DATABASE_SECRET") {
            Some(value) => {
                validate_secret_strength(&value, "STOREFRONT_DATABASE_SECRET")?;
                Some(SecretString::from(value))
            }
            None => None,
        };
        let poll_interval = get_millis("STOREFRONT_POLL_INTERVAL_MS", 2000)?;

        Ok(Some(Self {
            url,
            secret,
            poll_interval,
        }))
    }
}

impl ShopSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let whatsapp_number = get_env_or_default("SHOP_WHATSAPP_NUMBER", &defaults.whatsapp_number);
        validate_phone_number(&whatsapp_number, "SHOP_WHATSAPP_NUMBER")?;

        Ok(Self {
            name: get_env_or_default("SHOP_NAME", &defaults.name),
            whatsapp_number,
            currency: get_env_or_default("SHOP_CURRENCY", &defaults.currency),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a duration in milliseconds with a default value.
fn get_millis(key: &str, default: u64) -> Result<Duration, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(Duration::from_millis(default));
    };
    let millis = raw
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if millis == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_millis(millis))
}

/// Parse the database URL, requiring http(s).
fn parse_database_url(raw: &str) -> Result<Url, ConfigError> {
    let key = "STOREFRONT_DATABASE_URL";
    let url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must have a host".to_string(),
        ));
    }
    Ok(url)
}

/// Messaging recipients are international numbers without `+` or spaces.
fn validate_phone_number(number: &str, var_name: &str) -> Result<(), ConfigError> {
    if number.len() < 8 || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be at least 8 digits with country code and nothing else".to_string(),
        ));
    }
    Ok(())
}

/// Shannon entropy of `s`, in bits per character.
#[allow(clippy::cast_precision_loss)] // secrets are far shorter than 2^52 chars
fn shannon_entropy(s: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    counts
        .into_values()
        .map(|n| n as f64 / total)
        .map(|p| -p * p.log2())
        .sum()
}

/// Reject secrets that look like placeholders or carry too little entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let insecure = |reason: String| ConfigError::InsecureSecret(var_name.to_string(), reason);

    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(insecure(format!("looks like a placeholder ('{pattern}')")));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(insecure(format!(
            "{entropy:.2} bits/char is below the {MIN_ENTROPY_BITS_PER_CHAR:.1} minimum"
        )));
    }
    Ok(())
}
