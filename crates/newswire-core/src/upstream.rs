// newswire-core/src/upstream.rs
// ============================================================================
// Module: Upstream Interface
// Description: Upstream client contract and failure taxonomy.
// Purpose: Decouple dispatch from the concrete news API client.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! The dispatcher talks to the external news API only through
//! [`UpstreamClient`], so the concrete HTTP client lives in its own crate and
//! tests can substitute a recording fake. Every upstream failure is one of
//! the [`UpstreamError`] classes; the dispatcher never sees a transport
//! panic or a foreign error type.

use serde_json::Value;
use thiserror::Error;

use crate::validate::ValidatedArguments;

/// Classified upstream failure.
///
/// # Invariants
/// - Variants are stable for error-code mapping at the transport boundary.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream host could not be reached.
    #[error("upstream unreachable: {0}")]
    Unreachable(String),
    /// The upstream rejected the configured credential.
    #[error("upstream authentication failed: {0}")]
    Auth(String),
    /// The upstream answered with a non-success status.
    #[error("upstream returned status {status}: {body}")]
    Status {
        /// HTTP status code returned by the upstream.
        status: u16,
        /// Raw response body text, not parsed as JSON.
        body: String,
    },
    /// The upstream answered success with an unparseable body.
    #[error("upstream response malformed: {0}")]
    Malformed(String),
}

/// Client contract for the external news API.
///
/// Implementations issue exactly one request per call: no retry, no backoff.
/// A single upstream failure surfaces immediately as an [`UpstreamError`].
pub trait UpstreamClient: Send + Sync {
    /// Performs a parameterized GET against `endpoint` and returns the JSON
    /// body.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] classifying the failure.
    fn fetch(&self, endpoint: &str, args: &ValidatedArguments) -> Result<Value, UpstreamError>;
}
