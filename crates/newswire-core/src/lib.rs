// newswire-core/src/lib.rs
// ============================================================================
// Module: Newswire Core Library
// Description: Tool catalog, validation, and dispatch for the Newswire gateway.
// Purpose: Transport-agnostic dispatch core shared by all transports.
// Dependencies: jsonschema, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `newswire-core` defines the schema-driven tool registry, argument
//! validation, and the dispatcher that routes validated tool calls to the
//! upstream news API. Both transport adapters consume this crate, which
//! guarantees identical validation and error semantics regardless of the
//! transport a request arrived on.
//!
//! Each tool is declared exactly once as a [`ToolSpec`]; the wire-visible
//! input schema and the compiled validator are both derived from that single
//! declaration, so the advertised contract and the enforced contract cannot
//! drift apart.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod dispatch;
pub mod tooling;
pub mod upstream;
pub mod validate;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::ParamKind;
pub use catalog::ParamSpec;
pub use catalog::ToolDefinition;
pub use catalog::ToolSpec;
pub use catalog::catalog;
pub use dispatch::DispatchError;
pub use dispatch::Dispatcher;
pub use tooling::ToolName;
pub use upstream::UpstreamClient;
pub use upstream::UpstreamError;
pub use validate::ParamValue;
pub use validate::RegistryEntry;
pub use validate::ToolRegistry;
pub use validate::ValidatedArguments;
pub use validate::ValidationError;
