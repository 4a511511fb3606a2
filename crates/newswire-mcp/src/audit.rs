// newswire-mcp/src/audit.rs
// ============================================================================
// Module: Request Audit Logging
// Description: Structured audit events for served JSON-RPC requests.
// Purpose: Emit one redacted audit line per request without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines the audit event payload and sinks for request
//! logging. It is intentionally lightweight so deployments can route events
//! to their preferred logging pipeline without redesign. Events never carry
//! tool arguments or upstream payloads; the credential cannot leak through
//! the audit channel.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::config::ServerTransport;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct RequestAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Transport used for the request.
    pub transport: ServerTransport,
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// JSON-RPC method name.
    pub method: String,
    /// Tool name when available (tools/call).
    pub tool: Option<String>,
    /// Request outcome label.
    pub outcome: &'static str,
    /// JSON-RPC error code when present.
    pub error_code: Option<i64>,
    /// Request handling duration in milliseconds.
    pub duration_ms: u128,
}

/// Inputs required to construct a request audit event.
pub struct RequestAuditEventParams {
    /// Transport used for the request.
    pub transport: ServerTransport,
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// JSON-RPC method name.
    pub method: String,
    /// Tool name when available (tools/call).
    pub tool: Option<String>,
    /// Request outcome label.
    pub outcome: &'static str,
    /// JSON-RPC error code when present.
    pub error_code: Option<i64>,
    /// Request handling duration in milliseconds.
    pub duration_ms: u128,
}

impl RequestAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: RequestAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "rpc_request",
            timestamp_ms,
            transport: params.transport,
            request_id: params.request_id,
            method: params.method,
            tool: params.tool,
            outcome: params.outcome,
            error_code: params.error_code,
            duration_ms: params.duration_ms,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for request events.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &RequestAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &RequestAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &RequestAuditEvent) {}
}
