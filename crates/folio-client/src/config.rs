//! # Client Configuration
//!
//! Configuration for reaching the bookstore backend and locating the cart.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     FOLIO_BACKEND_URL=https://books.example.com                         │
//! │     FOLIO_TIMEOUT_SECS=10                                               │
//! │     FOLIO_STORAGE_PATH=/tmp/folio.db                                    │
//! │     FOLIO_CART_KEY=cart                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/folio/folio.toml (Linux)                                  │
//! │     ~/Library/Application Support/com.folio.storefront/folio.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     http://localhost:8000, key "cart", no timeout                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # folio.toml
//! [backend]
//! url = "http://localhost:8000"
//! timeout_secs = 10      # omit for the transport default
//!
//! [storage]
//! path = "/home/me/.local/share/folio/folio.db"
//! cart_key = "cart"
//!
//! [storefront]
//! home_featured_limit = 6
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Backend Settings
// =============================================================================

/// Where the bookstore API lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL; `/api/...` paths are appended to it.
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Per-request timeout (seconds). `None` uses the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            url: default_backend_url(),
            timeout_secs: None,
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the cart is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Defaults to `folio.db` in the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Storage key for the cart entry.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_cart_key() -> String {
    "cart".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            path: None,
            cart_key: default_cart_key(),
        }
    }
}

// =============================================================================
// Storefront Settings
// =============================================================================

/// View-level tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontSettings {
    /// Number of featured books on the home view.
    #[serde(default = "default_home_featured_limit")]
    pub home_featured_limit: u32,
}

fn default_home_featured_limit() -> u32 {
    6
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        StorefrontSettings {
            home_featured_limit: default_home_featured_limit(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub storefront: StorefrontSettings,
}

impl ClientConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (folio.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        self.backend_url()?;

        if self.storage.cart_key.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "storage.cart_key must not be empty".into(),
            ));
        }

        if self.backend.timeout_secs == Some(0) {
            return Err(ClientError::InvalidConfig(
                "backend.timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any name → value lookup.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FOLIO_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.url = url;
        }

        if let Some(timeout) = lookup("FOLIO_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.backend.timeout_secs = Some(secs),
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric FOLIO_TIMEOUT_SECS"),
            }
        }

        if let Some(path) = lookup("FOLIO_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("FOLIO_CART_KEY") {
            self.storage.cart_key = key;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "folio", "storefront")
            .map(|dirs| dirs.config_dir().join("folio.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Parsed backend base URL. Only `http` and `https` are accepted.
    pub fn backend_url(&self) -> ClientResult<Url> {
        let url = Url::parse(self.backend.url.trim())?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "Backend URL must start with http:// or https://, got: {}",
                self.backend.url
            )));
        }

        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "Backend URL cannot have paths appended: {}",
                self.backend.url
            )));
        }

        Ok(url)
    }

    /// Request timeout, if one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.backend.timeout_secs.map(Duration::from_secs)
    }

    /// Resolved SQLite path for the cart.
    pub fn storage_path(&self) -> PathBuf {
        self.storage.path.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("com", "folio", "storefront")
                .map(|dirs| dirs.data_dir().join("folio.db"))
                .unwrap_or_else(|| PathBuf::from("folio.db"))
        })
    }

    /// Storage key for the cart entry.
    pub fn cart_key(&self) -> &str {
        &self.storage.cart_key
    }
}
