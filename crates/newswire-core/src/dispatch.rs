// newswire-core/src/dispatch.rs
// ============================================================================
// Module: Dispatcher
// Description: Tool resolution, validation, and upstream invocation.
// Purpose: Single chokepoint for tool calls from every transport.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! The dispatcher resolves a tool name against the registry, validates the
//! raw arguments, and invokes the upstream client with the tool's bound
//! endpoint. It always returns a [`Result`] value; no error from the
//! registry or the client propagates past it unclassified. Both transports
//! call through here, which guarantees identical validation and error
//! semantics regardless of where a request arrived.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::upstream::UpstreamClient;
use crate::upstream::UpstreamError;
use crate::validate::ToolRegistry;
use crate::validate::ValidationError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Normalized dispatch failure.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The tool name is not in the catalog.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// The arguments violated the tool schema.
    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] ValidationError),
    /// The upstream call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Transport-agnostic tool dispatcher.
///
/// # Invariants
/// - The registry is immutable after construction; each dispatch call owns
///   only transient state, so concurrent calls never contend.
pub struct Dispatcher {
    /// Compiled tool registry shared with the transports.
    registry: Arc<ToolRegistry>,
    /// Upstream client bound at startup.
    client: Arc<dyn UpstreamClient>,
}

impl Dispatcher {
    /// Creates a dispatcher over a registry and an upstream client.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>, client: Arc<dyn UpstreamClient>) -> Self {
        Self {
            registry,
            client,
        }
    }

    /// Returns the shared registry.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Resolves, validates, and executes a tool call.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] for unknown tools, invalid arguments, or
    /// upstream failures; validation failures never reach the network.
    pub fn dispatch(&self, tool: &str, raw_args: &Value) -> Result<Value, DispatchError> {
        let Some(entry) = self.registry.get(tool) else {
            return Err(DispatchError::UnknownTool(tool.to_string()));
        };
        let validated = entry.validate(raw_args)?;
        let payload = self.client.fetch(entry.spec().endpoint, &validated)?;
        Ok(payload)
    }
}
