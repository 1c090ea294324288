//! Request layer: caching, invalidation and the error contract.

mod common;

use club_navigator::memory::ScriptedTransport;
use club_navigator::*;
use common::harness;
use serde::Deserialize;
use serde_json::json;
use std::rc::Rc;

fn client() -> (RequestClient, Rc<ScriptedTransport>) {
    let transport = Rc::new(ScriptedTransport::new());
    let client = RequestClient::new(transport.clone(), RequestConfig::default());
    (client, transport)
}

// ============================================================================
// GET cache
// ============================================================================

#[tokio::test]
async fn test_concurrent_cached_gets_share_one_request() {
    let (client, transport) = client();
    transport.respond_to("/api/events", 200, r#"[{"id":1}]"#);
    transport.pause();

    let first = client.get("/api/events", true);
    let second = client.get("/api/events", true);
    assert_eq!(transport.calls_to("/api/events"), 1);

    transport.resume();
    let (first, second) = futures::join!(first, second);

    assert_eq!(first.unwrap(), json!([{ "id": 1 }]));
    assert_eq!(second.unwrap(), json!([{ "id": 1 }]));
    assert_eq!(transport.calls_to("/api/events"), 1);
}

#[tokio::test]
async fn test_uncached_get_bypasses_cache() {
    let (client, transport) = client();

    client.get("/api/tags", true).await.unwrap();
    client.get("/api/tags", false).await.unwrap();

    assert_eq!(transport.calls_to("/api/tags"), 2);
}

#[tokio::test]
async fn test_mutation_clears_cache() {
    let (client, transport) = client();

    client.get("/api/events", true).await.unwrap();
    client.get("/api/balance", true).await.unwrap();
    client
        .post("/api/tags", &json!({ "name": "climbing" }))
        .await
        .unwrap();
    assert_eq!(client.cached_len(), 0);

    client.get("/api/events", true).await.unwrap();
    assert_eq!(transport.calls_to("/api/events"), 2);
}

#[tokio::test]
async fn test_every_mutating_verb_invalidates() {
    let (client, transport) = client();

    client.get("/api/users", true).await.unwrap();
    client.put("/api/users/1", &json!({ "role": "admin" })).await.unwrap();
    client.get("/api/users", true).await.unwrap();
    client.delete("/api/users/1").await.unwrap();
    client.get("/api/users", true).await.unwrap();

    assert_eq!(transport.calls_to("/api/users"), 3);
}

#[tokio::test]
async fn test_failed_cached_get_is_retried() {
    let (client, transport) = client();
    transport.push_network_error();

    let failed = client.get("/api/events", true).await;
    assert_eq!(failed, Err(RequestError::Network));
    assert!(!client.is_cached("/api/events"));

    let retried = client.get("/api/events", true).await;
    assert!(retried.is_ok());
    assert_eq!(transport.calls_to("/api/events"), 2);
}

#[tokio::test]
async fn test_parse_failure_is_evicted() {
    let (client, transport) = client();
    transport.push_response(200, "<!doctype html>");

    let err = client.get("/api/events", true).await.unwrap_err();
    assert!(matches!(err, RequestError::Parse { .. }));
    assert!(!client.is_cached("/api/events"));
}

#[tokio::test]
async fn test_late_failure_keeps_newer_entry() {
    let (client, transport) = client();
    transport.push_network_error();
    transport.pause();

    let stale = client.get("/api/events", true);
    client.clear_cache(Some("/api/events"));
    let fresh = client.get("/api/events", true);

    transport.resume();
    let (stale, fresh) = futures::join!(stale, fresh);
    assert!(stale.is_err());
    assert!(fresh.is_ok());

    // The failed request must not have evicted the entry that replaced it
    assert!(client.is_cached("/api/events"));
    client.get("/api/events", true).await.unwrap();
    assert_eq!(transport.calls_to("/api/events"), 2);
}

// ============================================================================
// Error contract
// ============================================================================

#[tokio::test]
async fn test_http_error_messages() {
    let (client, transport) = client();
    transport.push_response(404, r#"{"message":"No such event"}"#);
    transport.push_response(422, r#"{"message":"Event is full"}"#);
    transport.push_response(500, "Internal Server Error");

    let get = client.get("/api/events/9", false).await.unwrap_err();
    assert_eq!(get.to_string(), "Request failed with status: 404");

    let post = client.post("/api/events/9/signup", &json!({})).await.unwrap_err();
    assert_eq!(post.to_string(), "Event is full");
    assert_eq!(post.status(), Some(422));
    assert_eq!(post.body(), Some(&json!({ "message": "Event is full" })));

    let put = client.put("/api/events/9", &json!({})).await.unwrap_err();
    assert_eq!(put, RequestError::Status { status: 500 });
}

#[tokio::test]
async fn test_status_zero_is_network_error() {
    let (client, transport) = client();
    transport.push_response(0, "");

    let err = client.get("/api/events", false).await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.to_string(), "Network error");
}

#[tokio::test]
async fn test_empty_success_body() {
    let (client, transport) = client();
    transport.push_response(204, "");

    assert_eq!(
        client.delete("/api/files/3").await,
        Ok(serde_json::Value::Null)
    );
}

#[tokio::test]
async fn test_typed_get() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Balance {
        user: String,
        cents: i64,
    }

    let (client, transport) = client();
    transport.push_response(200, r#"{"user":"ada","cents":-450}"#);
    transport.push_response(200, r#"{"user":"ada"}"#);

    let balance: Balance = client.get_as("/api/balance", false).await.unwrap();
    assert_eq!(
        balance,
        Balance {
            user: "ada".to_string(),
            cents: -450
        }
    );

    let err = client.get_as::<Balance>("/api/balance", false).await.unwrap_err();
    assert!(matches!(err, RequestError::Parse { .. }));
}

// ============================================================================
// Connectivity side effect
// ============================================================================

#[tokio::test]
async fn test_requests_report_connectivity() {
    let h = harness("/events");

    h.transport.push_network_error();
    let err = h.requests().get("/api/events", false).await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(h.app.connection.status(), ConnectionStatus::Disconnected);

    // An HTTP error still proves the backend is reachable
    h.transport.push_response(403, "");
    let err = h.requests().get("/api/admin", false).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(h.app.connection.status(), ConnectionStatus::Connected);
}

#[tokio::test]
async fn test_unsendable_request_keeps_connection_state() {
    let h = harness("/events");
    h.transport.push_invalid_request("relative URL with no origin");

    let err = h.requests().get("/api/events", false).await.unwrap_err();

    assert!(matches!(err, RequestError::InvalidRequest { .. }));
    assert_eq!(h.app.connection.status(), ConnectionStatus::Connected);
    assert!(h.toasts.shown().is_empty());
}

// ============================================================================
// Requests outlive their callers
// ============================================================================

#[test]
fn test_abandoned_request_still_reports() {
    let h = harness("/events");
    h.transport.set_offline(true);

    drop(h.requests().delete("/api/files/1"));
    assert_eq!(h.transport.calls_to("/api/files/1"), 1);
    assert_eq!(h.app.connection.status(), ConnectionStatus::Connected);

    h.run_tasks();
    assert_eq!(h.app.connection.status(), ConnectionStatus::Disconnected);
    assert_eq!(h.toasts.count_message("Connection lost. Retrying..."), 1);
}

