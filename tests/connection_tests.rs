//! Connection monitor wired to the request layer and router.

mod common;

use club_navigator::host::ViewHost;
use club_navigator::*;
use common::{harness, record_events};
use std::time::Duration;

const LOST: &str = "Connection lost. Retrying...";
const RESTORED: &str = "Connection restored";

#[tokio::test]
async fn test_connectivity_transitions_are_edge_triggered() {
    let h = harness("/events");
    h.transport.set_offline(true);

    for _ in 0..11 {
        let _ = h.requests().get("/api/events", false).await;
    }
    assert_eq!(h.toasts.count_message(LOST), 1);
    assert_eq!(h.app.connection.status(), ConnectionStatus::Disconnected);

    h.transport.set_offline(false);
    h.requests().get("/api/events", false).await.unwrap();
    h.requests().get("/api/events", false).await.unwrap();

    assert_eq!(h.toasts.count_message(RESTORED), 1);
    assert_eq!(h.toasts.count_message(LOST), 1);
    let visible: Vec<String> = h.toasts.visible().into_iter().map(|t| t.message).collect();
    assert_eq!(visible, vec![RESTORED.to_string()]);
}

#[tokio::test]
async fn test_recovery_reloads_current_view() {
    let h = harness("/");
    h.router().switch_view("/events?page=2", false).await;
    let events = record_events(h.router());

    h.transport.push_network_error();
    let _ = h.requests().get("/api/events", true).await;
    assert!(events.borrow().is_empty());

    h.requests().get("/api/events", true).await.unwrap();

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].path, "/events?page=2");
}

#[tokio::test]
async fn test_fallback_view_after_recent_navigation() {
    let h = harness("/");
    h.router().switch_view("/events", false).await;
    assert_eq!(h.document.is_hidden("offline-view"), Some(true));

    h.clock.advance(Duration::from_secs(2));
    h.transport.push_network_error();
    let _ = h.requests().get("/api/events", false).await;
    assert_eq!(h.document.is_hidden("offline-view"), Some(false));

    h.requests().get("/api/events", false).await.unwrap();
    assert_eq!(h.document.is_hidden("offline-view"), Some(true));
    assert_eq!(h.document.is_hidden("events-view"), Some(false));
}

#[tokio::test]
async fn test_no_fallback_view_when_idle() {
    let h = harness("/");
    h.router().switch_view("/events", false).await;

    h.clock.advance(Duration::from_secs(60));
    h.transport.push_network_error();
    let _ = h.requests().get("/api/events", false).await;

    assert_eq!(h.app.connection.status(), ConnectionStatus::Disconnected);
    assert_eq!(h.document.is_hidden("offline-view"), Some(true));
}

#[tokio::test]
async fn test_probe_uses_health_endpoint() {
    let h = harness("/events");
    h.transport.respond_to("/api/health", 503, "");

    let status = h.app.connection.probe().await;

    assert_eq!(status, Some(ConnectionStatus::Disconnected));
    assert_eq!(h.transport.calls_to("/api/health"), 1);
    assert_eq!(h.toasts.count_message(LOST), 1);
}

#[tokio::test]
async fn test_probe_skipped_within_cooldown() {
    let h = harness("/events");
    h.requests().get("/api/events", false).await.unwrap();

    assert_eq!(h.app.connection.probe().await, None);
    h.clock.advance(Duration::from_secs(9));
    assert_eq!(h.app.connection.probe().await, None);
    h.clock.advance(Duration::from_secs(2));
    assert_eq!(
        h.app.connection.probe().await,
        Some(ConnectionStatus::Connected)
    );
    assert_eq!(h.transport.calls_to("/api/health"), 1);
}

#[tokio::test]
async fn test_unsendable_probe_changes_nothing() {
    let h = harness("/events");
    h.transport.push_invalid_request("relative URL with no origin");

    assert_eq!(h.app.connection.probe().await, None);
    assert_eq!(h.app.connection.status(), ConnectionStatus::Connected);
    assert_eq!(h.toasts.count_message(LOST), 0);
}

