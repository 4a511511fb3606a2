// newswire-client/src/client.rs
// ============================================================================
// Module: World News Client
// Description: Bounded HTTP client for World News API endpoints.
// Purpose: Issue one authenticated GET per call with strict limits.
// Dependencies: newswire-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! The client builds a request URL from the configured base plus the tool's
//! endpoint path, appends every non-empty validated argument as a query
//! parameter with its exact key casing (the upstream API is case-sensitive
//! on parameter names), and injects the `api-key` credential. Exactly one
//! request is issued per call; a single failure surfaces immediately.
//!
//! Security posture: the upstream response is untrusted; bodies are read
//! under a byte cap and non-success bodies are never parsed as JSON.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use newswire_core::UpstreamClient;
use newswire_core::UpstreamError;
use newswire_core::ValidatedArguments;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Query parameter name carrying the credential on every call.
const API_KEY_PARAM: &str = "api-key";
/// Default base URL of the World News API.
pub const DEFAULT_BASE_URL: &str = "https://api.worldnewsapi.com";
/// Default request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default maximum response size allowed, in bytes.
const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// Configuration for the World News client.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL requests are issued against.
    pub base_url: String,
    /// API credential injected on every call.
    pub api_key: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl UpstreamConfig {
    /// Creates a configuration with default limits for the given credential.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: concat!("newswire/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Overrides the base URL, e.g. to target a proxy or a test server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Client construction errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The credential is missing or empty.
    #[error("api key must not be empty")]
    MissingCredential,
    /// The base URL failed to parse.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// The HTTP client could not be constructed.
    #[error("http client build failed: {0}")]
    Build(String),
}

// ============================================================================
// SECTION: Client Implementation
// ============================================================================

/// Upstream client for the World News API.
pub struct WorldNewsClient {
    /// Client configuration, including limits and the credential.
    config: UpstreamConfig,
    /// Parsed base URL requests are joined against.
    base: Url,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl WorldNewsClient {
    /// Creates a new client with the given configuration.
    ///
    /// The credential is a construction precondition: callers fail fast here
    /// before any serving starts, never per-call.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the credential is absent, the base URL is
    /// invalid, or the HTTP client cannot be created.
    pub fn new(config: UpstreamConfig) -> Result<Self, ClientError> {
        if config.api_key.is_empty() {
            return Err(ClientError::MissingCredential);
        }
        let base = Url::parse(&config.base_url)
            .map_err(|err| ClientError::InvalidBaseUrl(err.to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;
        Ok(Self {
            config,
            base,
            client,
        })
    }

    /// Builds the request URL for an endpoint and validated arguments.
    fn request_url(&self, endpoint: &str, args: &ValidatedArguments) -> Result<Url, UpstreamError> {
        let mut url = self
            .base
            .join(endpoint)
            .map_err(|err| UpstreamError::Unreachable(format!("invalid endpoint url: {err}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in args.iter() {
                if value.is_empty() {
                    continue;
                }
                pairs.append_pair(name, &value.render());
            }
            pairs.append_pair(API_KEY_PARAM, &self.config.api_key);
        }
        Ok(url)
    }
}

impl UpstreamClient for WorldNewsClient {
    fn fetch(&self, endpoint: &str, args: &ValidatedArguments) -> Result<Value, UpstreamError> {
        let url = self.request_url(endpoint, args)?;
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| UpstreamError::Unreachable(err.to_string()))?;
        let status = response.status();
        let body = read_response_limited(response, self.config.max_response_bytes)?;
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::PAYMENT_REQUIRED
            || status == StatusCode::FORBIDDEN
        {
            return Err(UpstreamError::Auth(format!(
                "status {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&body)
            )));
        }
        if !status.is_success() {
            // Diagnostic transparency: the raw body text, never parsed.
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        serde_json::from_slice(&body).map_err(|err| UpstreamError::Malformed(err.to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(
    response: reqwest::blocking::Response,
    max_bytes: usize,
) -> Result<Vec<u8>, UpstreamError> {
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| UpstreamError::Malformed("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err(UpstreamError::Malformed("response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    handle
        .read_to_end(&mut buf)
        .map_err(|err| UpstreamError::Unreachable(format!("failed to read response: {err}")))?;
    if buf.len() > max_bytes {
        return Err(UpstreamError::Malformed("response exceeds size limit".to_string()));
    }
    Ok(buf)
}
