// newswire-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: MCP server implementations for stdio and HTTP transports.
// Purpose: Expose Newswire tools via JSON-RPC 2.0.
// Dependencies: newswire-core, newswire-client, axum, tokio
// ============================================================================

//! ## Overview
//! The MCP server exposes the Newswire tool catalog using JSON-RPC 2.0 over
//! two transports: a line-delimited stdio session and an HTTP endpoint. Both
//! route through [`crate::tools::ToolRouter`], so validation and error
//! semantics are identical on either transport. Every failure is returned as
//! a structured JSON-RPC error object; after startup nothing crashes the
//! process.
//!
//! On HTTP, every outcome — including internal errors — is serialized as an
//! HTTP 200 response carrying a JSON-RPC `result` or `error` envelope; the
//! HTTP status code never signals application-level failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::get;
use axum::routing::post;
use newswire_client::UpstreamConfig;
use newswire_client::WorldNewsClient;
use newswire_core::Dispatcher;
use newswire_core::ToolDefinition;
use newswire_core::ToolRegistry;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::audit::AuditSink;
use crate::audit::RequestAuditEvent;
use crate::audit::RequestAuditEventParams;
use crate::audit::StderrAuditSink;
use crate::config::NewswireConfig;
use crate::config::ServerTransport;
use crate::tools::ToolError;
use crate::tools::ToolRouter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JSON-RPC protocol version accepted and emitted.
const JSONRPC_VERSION: &str = "2.0";
/// MCP protocol revision announced during the `initialize` handshake.
const PROTOCOL_VERSION: &str = "2024-11-05";
/// JSON-RPC error code for malformed request envelopes.
const INVALID_REQUEST: i64 = -32600;
/// JSON-RPC error code for unknown methods and unknown tools.
const METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC error code for invalid tool parameters.
const INVALID_PARAMS: i64 = -32602;
/// JSON-RPC error code for internal failures.
const INTERNAL_ERROR: i64 = -32603;
/// JSON-RPC error code for upstream failures.
const UPSTREAM_ERROR: i64 = -32000;

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// MCP server instance.
pub struct McpServer {
    /// Server configuration.
    config: NewswireConfig,
    /// Shared request-handling state.
    state: Arc<ServerState>,
}

impl McpServer {
    /// Builds a new MCP server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when configuration is invalid or the
    /// registry or upstream client cannot be constructed.
    pub fn from_config(config: NewswireConfig) -> Result<Self, McpServerError> {
        Self::with_audit(config, Arc::new(StderrAuditSink))
    }

    /// Builds a new MCP server with an explicit audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when initialization fails.
    pub fn with_audit(
        config: NewswireConfig,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, McpServerError> {
        config.validate().map_err(|err| McpServerError::Config(err.to_string()))?;
        let registry =
            Arc::new(ToolRegistry::new().map_err(|err| McpServerError::Init(err.to_string()))?);
        let upstream = UpstreamConfig::new(config.api_key.clone())
            .with_base_url(config.base_url.clone());
        let client =
            WorldNewsClient::new(upstream).map_err(|err| McpServerError::Init(err.to_string()))?;
        let router = ToolRouter::new(Dispatcher::new(registry, Arc::new(client)));
        let state = Arc::new(ServerState {
            router,
            audit,
            max_body_bytes: config.max_body_bytes,
        });
        Ok(Self {
            config,
            state,
        })
    }

    /// Serves requests using the configured transport.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the server fails.
    pub async fn serve(self) -> Result<(), McpServerError> {
        match self.config.transport {
            ServerTransport::Stdio => serve_stdio(&self.state),
            ServerTransport::Http => serve_http(&self.config, self.state).await,
        }
    }
}

/// Shared server state for request handlers.
struct ServerState {
    /// Tool router for request dispatch.
    router: ToolRouter,
    /// Audit sink receiving one event per served request.
    audit: Arc<dyn AuditSink>,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

// ============================================================================
// SECTION: Stdio Transport
// ============================================================================

/// Serves line-delimited JSON-RPC requests over stdin/stdout.
fn serve_stdio(state: &Arc<ServerState>) -> Result<(), McpServerError> {
    // Readiness goes to the diagnostic channel, never the protocol channel.
    let _ = writeln!(std::io::stderr(), "newswire-mcp: serving MCP over stdio");
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut writer = std::io::stdout();
    serve_stdio_io(state, &mut reader, &mut writer)
}

/// Runs the stdio request loop over arbitrary reader/writer pairs.
///
/// Requests are handled strictly in arrival order; each response line
/// mirrors the request `id` so callers correlate by identifier, not timing.
fn serve_stdio_io(
    state: &Arc<ServerState>,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> Result<(), McpServerError> {
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
        if bytes == 0 {
            // Session lifetime is process lifetime; EOF ends both.
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let response = if trimmed.len() > state.max_body_bytes {
            Some(error_response(Value::Null, INVALID_REQUEST, "request body too large"))
        } else {
            match serde_json::from_str::<JsonRpcRequest>(trimmed) {
                Ok(request) => handle_request(state, ServerTransport::Stdio, request),
                Err(_) => Some(error_response(Value::Null, INVALID_REQUEST, "Invalid Request")),
            }
        };
        if let Some(response) = response {
            write_response_line(writer, &response)?;
        }
    }
}

/// Writes one serialized JSON-RPC response line.
fn write_response_line(
    writer: &mut impl Write,
    response: &JsonRpcResponse,
) -> Result<(), McpServerError> {
    let payload = serde_json::to_vec(response)
        .map_err(|_| McpServerError::Transport("json-rpc serialization failed".to_string()))?;
    writer
        .write_all(&payload)
        .and_then(|()| writer.write_all(b"\n"))
        .and_then(|()| writer.flush())
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Serves JSON-RPC requests over HTTP.
async fn serve_http(
    config: &NewswireConfig,
    state: Arc<ServerState>,
) -> Result<(), McpServerError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = http_app(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|_| McpServerError::Transport("http bind failed".to_string()))?;
    let _ = writeln!(std::io::stderr(), "newswire-mcp: serving MCP over http on {addr}");
    axum::serve(listener, app)
        .await
        .map_err(|_| McpServerError::Transport("http server failed".to_string()))
}

/// Builds the HTTP application with the liveness and JSON-RPC routes.
fn http_app(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/mcp", post(handle_mcp))
        .with_state(state)
}

/// Handles the liveness endpoint.
async fn handle_health() -> axum::Json<Value> {
    axum::Json(json!({
        "status": "ok",
        "message": "Newswire MCP gateway is running"
    }))
}

/// Handles HTTP JSON-RPC requests.
async fn handle_mcp(
    State(state): State<Arc<ServerState>>,
    bytes: Bytes,
) -> axum::Json<JsonRpcResponse> {
    if bytes.len() > state.max_body_bytes {
        return axum::Json(error_response(Value::Null, INVALID_REQUEST, "request body too large"));
    }
    let response = match serde_json::from_slice::<JsonRpcRequest>(&bytes) {
        Ok(request) => handle_request(&state, ServerTransport::Http, request)
            .unwrap_or_else(notification_accepted),
        Err(_) => error_response(Value::Null, INVALID_REQUEST, "Invalid Request"),
    };
    axum::Json(response)
}

/// Response used when an HTTP caller submits a notification.
fn notification_accepted() -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: JSONRPC_VERSION,
        id: Value::Null,
        result: None,
        error: None,
    }
}

// ============================================================================
// SECTION: JSON-RPC Handling
// ============================================================================

/// Incoming JSON-RPC request payload.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC protocol version.
    jsonrpc: String,
    /// Request identifier; absent for notifications.
    #[serde(default)]
    id: Value,
    /// Method name.
    method: String,
    /// Optional parameters payload.
    params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    jsonrpc: &'static str,
    /// Request identifier.
    id: Value,
    /// Successful result payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    /// Error payload when the request fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error payload.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    /// Error code.
    code: i64,
    /// Human-readable error message.
    message: String,
}

/// Tool call parameters for JSON-RPC requests.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    /// Tool name.
    name: String,
    /// Raw JSON arguments.
    #[serde(default)]
    arguments: Value,
}

/// Tool list response payload.
#[derive(Debug, Serialize)]
struct ToolListResult {
    /// Registered tool definitions.
    tools: Vec<ToolDefinition>,
}

/// Tool call response payload.
#[derive(Debug, Serialize)]
struct ToolCallResult {
    /// Tool output content.
    content: Vec<ToolContent>,
}

/// Tool output payloads for JSON-RPC responses.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ToolContent {
    /// Textual tool output carrying the upstream JSON body.
    Text {
        /// Serialized JSON payload.
        text: String,
    },
}

/// Dispatches a JSON-RPC request to the tool router.
///
/// Returns `None` for notifications, which must not produce a response.
fn handle_request(
    state: &ServerState,
    transport: ServerTransport,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    if request.method.starts_with("notifications/") {
        return None;
    }
    let started = Instant::now();
    let request_id = request_id_label(&request.id);
    let method = request.method.clone();
    let mut tool = None;
    let response = if request.jsonrpc == JSONRPC_VERSION {
        route_request(state, request, &mut tool)
    } else {
        error_response(request.id, INVALID_REQUEST, "Invalid Request")
    };
    let (outcome, error_code) = match &response.error {
        Some(error) => ("error", Some(error.code)),
        None => ("ok", None),
    };
    state.audit.record(&RequestAuditEvent::new(RequestAuditEventParams {
        transport,
        request_id,
        method,
        tool,
        outcome,
        error_code,
        duration_ms: started.elapsed().as_millis(),
    }));
    Some(response)
}

/// Routes a version-checked request to its method handler.
fn route_request(
    state: &ServerState,
    request: JsonRpcRequest,
    tool: &mut Option<String>,
) -> JsonRpcResponse {
    match request.method.as_str() {
        "initialize" => ok_response(request.id, initialize_result()),
        "tools/list" => {
            let tools = state.router.list_tools();
            match serde_json::to_value(ToolListResult {
                tools,
            }) {
                Ok(value) => ok_response(request.id, value),
                Err(_) => jsonrpc_error(request.id, &ToolError::Serialization),
            }
        }
        "tools/call" => {
            let id = request.id;
            let params = request.params.unwrap_or(Value::Null);
            match serde_json::from_value::<ToolCallParams>(params) {
                Ok(call) => {
                    *tool = Some(call.name.clone());
                    match call_tool_with_blocking(&state.router, &call.name, &call.arguments) {
                        Ok(payload) => wrap_tool_payload(id, &payload),
                        Err(err) => jsonrpc_error(id, &err),
                    }
                }
                Err(_) => error_response(id, INVALID_PARAMS, "invalid tool params"),
            }
        }
        _ => error_response(request.id, METHOD_NOT_FOUND, "Method not found"),
    }
}

/// Builds the `initialize` handshake result.
fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": "newswire",
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

/// Wraps an upstream payload as MCP textual content.
fn wrap_tool_payload(id: Value, payload: &Value) -> JsonRpcResponse {
    let Ok(text) = serde_json::to_string(payload) else {
        return jsonrpc_error(id, &ToolError::Serialization);
    };
    match serde_json::to_value(ToolCallResult {
        content: vec![ToolContent::Text {
            text,
        }],
    }) {
        Ok(value) => ok_response(id, value),
        Err(_) => jsonrpc_error(id, &ToolError::Serialization),
    }
}

/// Executes a tool call, shifting to a blocking context when available.
fn call_tool_with_blocking(
    router: &ToolRouter,
    name: &str,
    arguments: &Value,
) -> Result<Value, ToolError> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(|| router.handle_tool_call(name, arguments))
        }
        _ => router.handle_tool_call(name, arguments),
    }
}

/// Builds a success response envelope.
fn ok_response(id: Value, result: Value) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: JSONRPC_VERSION,
        id,
        result: Some(result),
        error: None,
    }
}

/// Builds an error response envelope.
fn error_response(id: Value, code: i64, message: &str) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: JSONRPC_VERSION,
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_string(),
        }),
    }
}

/// Builds a JSON-RPC error response for a tool failure.
fn jsonrpc_error(id: Value, error: &ToolError) -> JsonRpcResponse {
    let (code, message) = match error {
        ToolError::UnknownTool(name) => (METHOD_NOT_FOUND, format!("unknown tool: {name}")),
        ToolError::InvalidParams(message) => (INVALID_PARAMS, message.clone()),
        ToolError::Upstream {
            message, ..
        } => (UPSTREAM_ERROR, message.clone()),
        ToolError::Serialization => (INTERNAL_ERROR, "Internal error".to_string()),
    };
    JsonRpcResponse {
        jsonrpc: JSONRPC_VERSION,
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message,
        }),
    }
}

/// Renders the request id for audit events.
fn request_id_label(id: &Value) -> Option<String> {
    if id.is_null() { None } else { Some(id.to_string()) }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// MCP server errors.
#[derive(Debug, thiserror::Error)]
pub enum McpServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
