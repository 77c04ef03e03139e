//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VITRINE_API_URL` - Marketing API base URL (default: `http://localhost:3333/api`)
//! - `VITRINE_MEDIA_URL` - Media CDN base URL for bare storage paths
//! - `VITRINE_STATE_PATH` - Path of the durable key-value state file
//! - `VITRINE_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)

use std::path::PathBuf;

use thiserror::Error;

/// Default marketing API base address for local development.
const DEFAULT_API_URL: &str = "http://localhost:3333/api";

/// Default CDN base for resolving bare media storage paths.
const DEFAULT_MEDIA_URL: &str = "https://cdn.vitrine.dev/prod/";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Marketing-API client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Marketing API base URL.
    pub api_url: String,
    /// CDN base URL prepended to bare media storage paths.
    pub media_url: String,
    /// Where the durable selection/token state file lives.
    pub state_path: Option<PathBuf>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            media_url: DEFAULT_MEDIA_URL.to_string(),
            state_path: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_env_or_default("VITRINE_API_URL", DEFAULT_API_URL);
        let media_url = get_env_or_default("VITRINE_MEDIA_URL", DEFAULT_MEDIA_URL);
        let state_path = get_optional_env("VITRINE_STATE_PATH").map(PathBuf::from);
        let request_timeout_secs = match get_optional_env("VITRINE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("VITRINE_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            media_url,
            state_path,
            request_timeout_secs,
        })
    }

    /// Base URL for a specific deployment, with remaining defaults.
    #[must_use]
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.state_path.is_none());
    }

    #[test]
    fn test_with_api_url() {
        let config = ClientConfig::with_api_url("https://api.example.com/api");
        assert_eq!(config.api_url, "https://api.example.com/api");
        assert_eq!(config.media_url, DEFAULT_MEDIA_URL);
    }
}
