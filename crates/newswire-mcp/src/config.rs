// newswire-mcp/src/config.rs
// ============================================================================
// Module: Gateway Configuration
// Description: Environment configuration for the Newswire MCP server.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, url
// ============================================================================

//! ## Overview
//! The gateway is configured from process-wide environment variables: the
//! upstream credential (required), the HTTP listen port, and an optional
//! upstream base-URL override for proxies and integration tests. Missing or
//! invalid configuration fails closed before any transport starts serving;
//! the credential check is a startup precondition, never a per-call retry
//! condition.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the upstream credential.
pub const ENV_API_KEY: &str = "WORLD_NEWS_API_KEY";
/// Environment variable overriding the HTTP listen port.
pub const ENV_PORT: &str = "NEWSWIRE_PORT";
/// Environment variable overriding the upstream base URL.
pub const ENV_BASE_URL: &str = "WORLD_NEWS_API_BASE_URL";
/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.worldnewsapi.com";
/// Default HTTP listen port.
pub const DEFAULT_HTTP_PORT: u16 = 8080;
/// Default maximum request body size in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Transport the server accepts requests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerTransport {
    /// Line-delimited JSON-RPC over stdin/stdout.
    Stdio,
    /// JSON-RPC over HTTP.
    Http,
}

/// Newswire gateway configuration.
#[derive(Debug, Clone)]
pub struct NewswireConfig {
    /// Upstream API credential.
    pub api_key: String,
    /// Upstream base URL.
    pub base_url: String,
    /// HTTP listen port.
    pub port: u16,
    /// Transport to serve on.
    pub transport: ServerTransport,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl NewswireConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the credential is absent or any value is
    /// invalid; nothing is served in that case.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var(ENV_API_KEY).map_err(|_| ConfigError::MissingCredential)?;
        let base_url = env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let port = match env::var(ENV_PORT) {
            Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };
        let config = Self {
            api_key,
            base_url,
            port,
            transport: ServerTransport::Stdio,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration before serving starts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential);
        }
        let url = Url::parse(&self.base_url)
            .map_err(|err| ConfigError::InvalidBaseUrl(err.to_string()))?;
        if url.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl("base url requires a host".to_string()));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidLimit("max_body_bytes must be non-zero".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - All variants are fatal at startup; none are retried per call.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The upstream credential is not configured.
    #[error("environment variable WORLD_NEWS_API_KEY must be set to a non-empty api key")]
    MissingCredential,
    /// The listen port failed to parse.
    #[error("invalid port: {0}")]
    InvalidPort(String),
    /// The upstream base URL is invalid.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// A size limit is out of range.
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
}
