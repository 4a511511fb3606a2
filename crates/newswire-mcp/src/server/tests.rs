// newswire-mcp/src/server/tests.rs
// ============================================================================
// Module: MCP Server Unit Tests
// Description: Unit tests for JSON-RPC routing and stdio framing.
// Purpose: Validate envelope handling with in-memory fixtures.
// Dependencies: newswire-mcp, newswire-core
// ============================================================================

//! ## Overview
//! Exercises the shared request handler and the stdio loop with in-memory
//! fixtures: envelope version checks, method routing, tool-call wrapping,
//! notification handling, and id correlation.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::BufReader;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::Mutex;

use serde_json::Value;
use serde_json::json;

use super::JsonRpcRequest;
use super::JsonRpcResponse;
use super::ServerState;
use super::handle_request;
use super::serve_stdio_io;
use crate::audit::AuditSink;
use crate::audit::RequestAuditEvent;
use crate::config::DEFAULT_MAX_BODY_BYTES;
use crate::config::ServerTransport;
use crate::tools::tests::StaticClient;
use crate::tools::tests::router_with;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Audit sink recording events for assertions.
#[derive(Default)]
struct TestAudit {
    /// Recorded events.
    events: Mutex<Vec<RequestAuditEvent>>,
}

impl AuditSink for TestAudit {
    fn record(&self, event: &RequestAuditEvent) {
        self.events.lock().expect("events lock").push(event.clone());
    }
}

/// Builds server state over a canned upstream outcome.
fn state_with(client: Arc<StaticClient>, audit: Arc<TestAudit>) -> Arc<ServerState> {
    Arc::new(ServerState {
        router: router_with(client),
        audit,
        max_body_bytes: DEFAULT_MAX_BODY_BYTES,
    })
}

/// Builds server state with a default success payload.
fn default_state() -> Arc<ServerState> {
    state_with(StaticClient::new(|| Ok(json!({ "news": [] }))), Arc::new(TestAudit::default()))
}

/// Parses a request literal.
fn request(value: Value) -> JsonRpcRequest {
    serde_json::from_value(value).expect("request parses")
}

/// Handles a request and expects a response.
fn respond(state: &ServerState, value: Value) -> JsonRpcResponse {
    handle_request(state, ServerTransport::Http, request(value)).expect("response expected")
}

/// Extracts the error code from a response.
fn error_code(response: &JsonRpcResponse) -> i64 {
    response.error.as_ref().expect("error expected").code
}

// ============================================================================
// SECTION: Envelope Tests
// ============================================================================

/// Verifies a wrong protocol version is rejected with -32600.
#[test]
fn wrong_version_rejected() {
    let state = default_state();
    let response =
        respond(&state, json!({ "jsonrpc": "1.0", "id": 1, "method": "tools/list" }));
    assert_eq!(error_code(&response), -32600);
    assert_eq!(response.error.as_ref().expect("error").message, "Invalid Request");
    assert!(response.result.is_none());
}

/// Verifies a wrong version never reaches dispatch.
#[test]
fn wrong_version_skips_dispatch() {
    let client = StaticClient::new(|| Ok(json!({})));
    let state = state_with(Arc::clone(&client), Arc::new(TestAudit::default()));
    respond(
        &state,
        json!({
            "jsonrpc": "1.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": "search_news", "arguments": {} }
        }),
    );
    assert_eq!(*client.calls.lock().expect("calls lock"), 0);
}

/// Verifies unknown methods yield -32601.
#[test]
fn unknown_method_rejected() {
    let state = default_state();
    let response =
        respond(&state, json!({ "jsonrpc": "2.0", "id": 2, "method": "resources/list" }));
    assert_eq!(error_code(&response), -32601);
}

/// Verifies the response mirrors the request id.
#[test]
fn response_mirrors_request_id() {
    let state = default_state();
    let response =
        respond(&state, json!({ "jsonrpc": "2.0", "id": 42, "method": "tools/list" }));
    assert_eq!(response.id, json!(42));

    let response = respond(
        &state,
        json!({ "jsonrpc": "2.0", "id": "alpha", "method": "tools/list" }),
    );
    assert_eq!(response.id, json!("alpha"));
}

/// Verifies notifications produce no response.
#[test]
fn notifications_produce_no_response() {
    let state = default_state();
    let outcome = handle_request(
        &state,
        ServerTransport::Stdio,
        request(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" })),
    );
    assert!(outcome.is_none());
}

// ============================================================================
// SECTION: Method Tests
// ============================================================================

/// Verifies the initialize handshake advertises the server.
#[test]
fn initialize_returns_server_info() {
    let state = default_state();
    let response =
        respond(&state, json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" }));
    let result = response.result.expect("result expected");
    assert_eq!(result["serverInfo"]["name"], "newswire");
    assert_eq!(result["protocolVersion"], super::PROTOCOL_VERSION);
}

/// Verifies tools/list returns the full catalog.
#[test]
fn tools_list_returns_catalog() {
    let state = default_state();
    let response =
        respond(&state, json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }));
    let result = response.result.expect("result expected");
    let tools = result["tools"].as_array().expect("tools array");
    assert_eq!(tools.len(), 8);
    assert_eq!(tools[0]["name"], "search_news");
    assert!(tools[0]["inputSchema"]["properties"]["number"].is_object());
}

/// Verifies a successful tools/call wraps the payload as textual content.
#[test]
fn tools_call_wraps_payload_as_text() {
    let client = StaticClient::new(|| Ok(json!({ "top_news": [] })));
    let state = state_with(Arc::clone(&client), Arc::new(TestAudit::default()));
    let response = respond(
        &state,
        json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": {
                "name": "get_top_news",
                "arguments": { "source-country": "us", "language": "en" }
            }
        }),
    );
    let result = response.result.expect("result expected");
    assert_eq!(result["content"][0]["type"], "text");
    let text = result["content"][0]["text"].as_str().expect("text content");
    let decoded: Value = serde_json::from_str(text).expect("text is JSON");
    assert_eq!(decoded, json!({ "top_news": [] }));
}

/// Verifies malformed tools/call params yield -32602.
#[test]
fn malformed_call_params_rejected() {
    let state = default_state();
    let response = respond(
        &state,
        json!({ "jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": "nope" }),
    );
    assert_eq!(error_code(&response), -32602);
}

/// Verifies unknown tools yield the tool-not-found variant of -32601.
#[test]
fn unknown_tool_rejected() {
    let state = default_state();
    let response = respond(
        &state,
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": { "name": "nonexistent_tool", "arguments": {} }
        }),
    );
    assert_eq!(error_code(&response), -32601);
    assert!(
        response.error.as_ref().expect("error").message.contains("unknown tool"),
        "message should identify the unknown tool"
    );
}

/// Verifies validation failures yield -32602 with the field name.
#[test]
fn invalid_arguments_rejected() {
    let state = default_state();
    let response = respond(
        &state,
        json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": { "name": "search_news", "arguments": { "number": 0 } }
        }),
    );
    assert_eq!(error_code(&response), -32602);
    assert!(response.error.as_ref().expect("error").message.contains("number"));
}

/// Verifies upstream failures yield -32000.
#[test]
fn upstream_failure_mapped() {
    let client = StaticClient::new(|| {
        Err(newswire_core::UpstreamError::Status {
            status: 500,
            body: "boom".to_string(),
        })
    });
    let state = state_with(client, Arc::new(TestAudit::default()));
    let response = respond(
        &state,
        json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "tools/call",
            "params": { "name": "get_geo_coordinates", "arguments": { "location": "Rome" } }
        }),
    );
    assert_eq!(error_code(&response), -32000);
}

// ============================================================================
// SECTION: Audit Tests
// ============================================================================

/// Verifies each handled request records one audit event.
#[test]
fn requests_record_audit_events() {
    let audit = Arc::new(TestAudit::default());
    let state = state_with(StaticClient::new(|| Ok(json!({}))), Arc::clone(&audit));
    respond(&state, json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }));
    respond(
        &state,
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": { "name": "search_news", "arguments": {} }
        }),
    );

    let events = audit.events.lock().expect("events lock");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].method, "tools/list");
    assert_eq!(events[0].outcome, "ok");
    assert_eq!(events[1].tool.as_deref(), Some("search_news"));
}

// ============================================================================
// SECTION: Stdio Framing Tests
// ============================================================================

/// Runs the stdio loop over an input script and returns response lines.
fn run_stdio(input: &str) -> Vec<Value> {
    let state = default_state();
    let mut reader = BufReader::new(Cursor::new(input.as_bytes().to_vec()));
    let mut output = Vec::new();
    serve_stdio_io(&state, &mut reader, &mut output).expect("stdio loop completes");
    String::from_utf8(output)
        .expect("utf8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("response line is JSON"))
        .collect()
}

/// Verifies requests are answered in order with correlated ids.
#[test]
fn stdio_answers_in_order_with_ids() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"search_news","arguments":{}}}"#,
        "\n",
    );
    let responses = run_stdio(input);
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 1);
    assert!(responses[0]["result"]["tools"].is_array());
    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"]["content"][0]["type"], "text");
}

/// Verifies blank lines are skipped and malformed lines answered.
#[test]
fn stdio_handles_blank_and_malformed_lines() {
    let input = "\nnot json\n";
    let responses = run_stdio(input);
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["error"]["code"], -32600);
    assert_eq!(responses[0]["error"]["message"], "Invalid Request");
}

/// Verifies notifications are consumed without a response line.
#[test]
fn stdio_swallows_notifications() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":9,"method":"tools/list"}"#,
        "\n",
    );
    let responses = run_stdio(input);
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 9);
}

/// Verifies EOF cleanly ends the session.
#[test]
fn stdio_ends_on_eof() {
    let responses = run_stdio("");
    assert!(responses.is_empty());
}
