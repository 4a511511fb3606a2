// newswire-mcp/src/tools.rs
// ============================================================================
// Module: MCP Tool Router
// Description: Tool routing for the Newswire MCP server.
// Purpose: Expose the dispatch core to both transports with normalized errors.
// Dependencies: newswire-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The tool router is the thin layer the transports call: it lists the
//! catalog and forwards tool calls to [`newswire_core::Dispatcher`],
//! normalizing every dispatch failure into a [`ToolError`] the transports
//! map onto JSON-RPC error codes.
//!
//! ## Invariants
//! - Validation failures never reach the upstream client.
//! - Responses are deterministic for identical inputs and catalog state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use newswire_core::DispatchError;
use newswire_core::Dispatcher;
use newswire_core::ToolDefinition;
use newswire_core::UpstreamError;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Normalized tool-call failure surfaced to the transports.
///
/// # Invariants
/// - Variants are stable for JSON-RPC error-code mapping.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool name is not in the catalog.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// The arguments violated the tool schema.
    #[error("{0}")]
    InvalidParams(String),
    /// The upstream call failed.
    #[error("{message}")]
    Upstream {
        /// Upstream HTTP status when one was received.
        status: Option<u16>,
        /// Human-readable failure description.
        message: String,
    },
    /// A response payload failed to serialize.
    #[error("serialization failed")]
    Serialization,
}

impl From<DispatchError> for ToolError {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::UnknownTool(name) => Self::UnknownTool(name),
            DispatchError::InvalidArguments(inner) => Self::InvalidParams(inner.to_string()),
            DispatchError::Upstream(inner) => {
                let status = match &inner {
                    UpstreamError::Status {
                        status, ..
                    } => Some(*status),
                    _ => None,
                };
                Self::Upstream {
                    status,
                    message: inner.to_string(),
                }
            }
        }
    }
}

// ============================================================================
// SECTION: Tool Router
// ============================================================================

/// Tool router for MCP requests.
pub struct ToolRouter {
    /// Dispatch core shared by every transport.
    dispatcher: Dispatcher,
}

impl ToolRouter {
    /// Creates a router over the dispatch core.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
        }
    }

    /// Returns the wire-visible tool definitions in catalog order.
    ///
    /// Listing has no side effects and returns the same catalog on every
    /// call.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.dispatcher.registry().definitions()
    }

    /// Executes a tool call and returns the upstream JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] classifying the failure for error-code mapping.
    pub fn handle_tool_call(&self, name: &str, arguments: &Value) -> Result<Value, ToolError> {
        let payload = self.dispatcher.dispatch(name, arguments)?;
        Ok(payload)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
