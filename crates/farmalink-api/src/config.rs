//! # API Configuration
//!
//! Configuration for the backend HTTP client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FARMALINK_API_URL=http://erp.local:5000                            │
//! │     FARMALINK_API_TIMEOUT_SECS=10                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/farmalink/api.toml (Linux)                               │
//! │     ~/Library/Application Support/es.farmalink.workbench/api.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://127.0.0.1:5000, 20 second timeout                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # api.toml
//! base_url = "http://erp.local:5000"
//! timeout_secs = 10
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Default backend address (the development server).
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing path.
    pub base_url: String,

    /// Per-request timeout in seconds. A request past this deadline is a
    /// transport failure; it is not retried.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Creates a config pointing at an explicit base URL, keeping the
    /// default timeout. Used by tests and by callers that already know
    /// where the backend lives.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        }
    }

    /// Loads configuration with the env > file > defaults priority chain.
    ///
    /// A malformed config file is logged and ignored (defaults win) - a
    /// broken local file should degrade the session, not kill it.
    pub fn load() -> Self {
        let mut config = Self::from_file().unwrap_or_default();

        if let Ok(base_url) = std::env::var("FARMALINK_API_URL") {
            config.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("FARMALINK_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = secs,
                _ => warn!(value = %timeout, "Ignoring invalid FARMALINK_API_TIMEOUT_SECS"),
            }
        }

        debug!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "API config resolved");
        config
    }

    /// Reads the TOML config file from the platform config directory.
    fn from_file() -> Option<Self> {
        let path = Self::config_file_path()?;
        let raw = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&raw) {
            Ok(config) => {
                debug!(?path, "Loaded API config file");
                Some(config)
            }
            Err(e) => {
                warn!(?path, error = %e, "Malformed API config file, using defaults");
                None
            }
        }
    }

    /// Platform-specific path of the config file.
    ///
    /// - **Linux**: `~/.config/farmalink/api.toml`
    /// - **macOS**: `~/Library/Application Support/es.farmalink.workbench/api.toml`
    /// - **Windows**: `%APPDATA%\farmalink\workbench\config\api.toml`
    pub fn config_file_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("es", "farmalink", "workbench")?;
        Some(dirs.config_dir().join("api.toml"))
    }

    /// The parsed base URL.
    pub fn base_url(&self) -> ApiResult<Url> {
        Url::parse(self.base_url.trim_end_matches('/')).map_err(ApiError::from)
    }

    /// The request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
