// newswire-client/tests/client.rs
// ============================================================================
// Module: World News Client Tests
// Description: Tests for upstream request construction and classification.
// Purpose: Validate query encoding, credential injection, and error taxonomy.
// Dependencies: newswire-client, newswire-core, tiny_http
// ============================================================================
//! ## Overview
//! Tests the upstream client against a local stub server:
//! - Happy path: exact request line, credential injection, JSON passthrough
//! - Error handling: auth statuses, non-2xx capture, malformed bodies
//! - Boundary enforcement: response size limits, unreachable hosts

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

use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use newswire_client::UpstreamConfig;
use newswire_client::WorldNewsClient;
use newswire_core::ParamValue;
use newswire_core::UpstreamClient;
use newswire_core::UpstreamError;
use newswire_core::ValidatedArguments;
use serde_json::json;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Spawns a stub server answering one request and capturing its URL.
fn spawn_server(
    body: &'static str,
    status: u16,
) -> (String, mpsc::Receiver<String>, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base = format!("http://{addr}");
    let (sender, receiver) = mpsc::channel();

    let handle = thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let _ = sender.send(request.url().to_string());
            let response = Response::from_string(body).with_status_code(status);
            let _ = request.respond(response);
        }
    });

    (base, receiver, handle)
}

/// Creates a client pointed at the stub server with the test credential.
fn local_client(base: &str) -> WorldNewsClient {
    WorldNewsClient::new(UpstreamConfig::new("test-key").with_base_url(base)).unwrap()
}

/// Builds validated arguments from literal pairs.
fn args(values: Vec<(&'static str, ParamValue)>) -> ValidatedArguments {
    ValidatedArguments::new(values)
}

// ============================================================================
// SECTION: Request Construction
// ============================================================================

/// Verifies the exact request line for a top-news call.
#[test]
fn fetch_issues_one_get_with_exact_query() {
    let (base, captured, handle) = spawn_server(r#"{"top_news":[]}"#, 200);
    let client = local_client(&base);

    let payload = client
        .fetch(
            "/top-news",
            &args(vec![
                ("source-country", ParamValue::String("us".to_string())),
                ("language", ParamValue::String("en".to_string())),
            ]),
        )
        .unwrap();
    assert_eq!(payload, json!({ "top_news": [] }));

    let url = captured.recv().unwrap();
    assert_eq!(url, "/top-news?source-country=us&language=en&api-key=test-key");
    // Exactly one request was issued.
    assert!(captured.recv().is_err());
    handle.join().unwrap();
}

/// Verifies empty string arguments are omitted from the query.
#[test]
fn empty_arguments_are_skipped() {
    let (base, captured, handle) = spawn_server(r#"{"news":[]}"#, 200);
    let client = local_client(&base);

    client
        .fetch(
            "/search-news",
            &args(vec![
                ("text", ParamValue::String(String::new())),
                ("number", ParamValue::Integer(10)),
            ]),
        )
        .unwrap();

    let url = captured.recv().unwrap();
    assert_eq!(url, "/search-news?number=10&api-key=test-key");
    handle.join().unwrap();
}

/// Verifies value rendering and encoding for mixed parameter types.
#[test]
fn query_values_are_rendered_and_encoded() {
    let (base, captured, handle) = spawn_server(r#"{"news":[]}"#, 200);
    let client = local_client(&base);

    client
        .fetch(
            "/search-news",
            &args(vec![
                ("text", ParamValue::String("climate change".to_string())),
                ("min-sentiment", ParamValue::Number(-0.5)),
                ("number", ParamValue::Integer(25)),
            ]),
        )
        .unwrap();

    let url = captured.recv().unwrap();
    assert_eq!(
        url,
        "/search-news?text=climate+change&min-sentiment=-0.5&number=25&api-key=test-key"
    );
    handle.join().unwrap();
}

/// Verifies boolean flags render as true/false.
#[test]
fn boolean_arguments_render_lowercase() {
    let (base, captured, handle) = spawn_server(r#"{"top_news":[]}"#, 200);
    let client = local_client(&base);

    client
        .fetch(
            "/top-news",
            &args(vec![
                ("source-country", ParamValue::String("de".to_string())),
                ("language", ParamValue::String("de".to_string())),
                ("headlines-only", ParamValue::Boolean(true)),
            ]),
        )
        .unwrap();

    let url = captured.recv().unwrap();
    assert!(url.contains("headlines-only=true"), "url was {url}");
    handle.join().unwrap();
}

// ============================================================================
// SECTION: Failure Classification
// ============================================================================

/// Verifies a 401 is classified as an authentication failure.
#[test]
fn unauthorized_status_classified_as_auth() {
    let (base, _captured, handle) = spawn_server(r#"{"error":"bad key"}"#, 401);
    let client = local_client(&base);

    let error = client.fetch("/top-news", &args(vec![])).unwrap_err();
    assert!(matches!(error, UpstreamError::Auth(_)), "got {error}");
    handle.join().unwrap();
}

/// Verifies a 402 quota response is classified as an authentication failure.
#[test]
fn payment_required_classified_as_auth() {
    let (base, _captured, handle) = spawn_server("quota exhausted", 402);
    let client = local_client(&base);

    let error = client.fetch("/search-news", &args(vec![])).unwrap_err();
    assert!(matches!(error, UpstreamError::Auth(_)), "got {error}");
    handle.join().unwrap();
}

/// Verifies other non-2xx statuses capture status code and raw body.
#[test]
fn http_error_captures_status_and_body() {
    let (base, _captured, handle) = spawn_server("not found", 404);
    let client = local_client(&base);

    let error = client.fetch("/geo-coordinates", &args(vec![])).unwrap_err();
    let UpstreamError::Status {
        status,
        body,
    } = error
    else {
        panic!("expected status error, got {error}");
    };
    assert_eq!(status, 404);
    assert_eq!(body, "not found");
    handle.join().unwrap();
}

/// Verifies a success status with a non-JSON body is malformed.
#[test]
fn malformed_success_body_rejected() {
    let (base, _captured, handle) = spawn_server("<html>maintenance</html>", 200);
    let client = local_client(&base);

    let error = client.fetch("/top-news", &args(vec![])).unwrap_err();
    assert!(matches!(error, UpstreamError::Malformed(_)), "got {error}");
    handle.join().unwrap();
}

/// Verifies an unreachable host is classified as such.
#[test]
fn unreachable_host_classified() {
    // Bind and drop a listener so the port is free but unanswered.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = local_client(&format!("http://{addr}"));
    let error = client.fetch("/top-news", &args(vec![])).unwrap_err();
    assert!(matches!(error, UpstreamError::Unreachable(_)), "got {error}");
}

/// Verifies responses above the byte cap are rejected.
#[test]
fn oversized_response_rejected() {
    let large = "x".repeat(4_096);
    let large_static: &'static str = Box::leak(large.into_boxed_str());
    let (base, _captured, handle) = spawn_server(large_static, 200);

    let mut config = UpstreamConfig::new("test-key").with_base_url(&base);
    config.max_response_bytes = 1_024;
    let client = WorldNewsClient::new(config).unwrap();

    let error = client.fetch("/top-news", &args(vec![])).unwrap_err();
    assert!(matches!(error, UpstreamError::Malformed(_)), "got {error}");
    handle.join().unwrap();
}

// ============================================================================
// SECTION: Construction Preconditions
// ============================================================================

/// Verifies the missing-credential precondition fails fast.
#[test]
fn empty_api_key_rejected_at_construction() {
    let result = WorldNewsClient::new(UpstreamConfig::new(""));
    assert!(result.is_err());
}

/// Verifies an invalid base URL fails fast.
#[test]
fn invalid_base_url_rejected_at_construction() {
    let result = WorldNewsClient::new(UpstreamConfig::new("key").with_base_url("not a url"));
    assert!(result.is_err());
}
