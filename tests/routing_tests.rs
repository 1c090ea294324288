//! Router behaviour against the in-memory page.

mod common;

use club_navigator::host::{BrowserLocation, ViewHost};
use club_navigator::*;
use common::{harness, hidden_views, record_events, router, VIEWS};

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_matching_is_anchored() {
    let (router, _document) = router("/");
    router.add_route("/admin/users", "users", RouteOptions::new());

    assert!(router.resolve("/admin/users").is_some());
    assert!(router.resolve("/admin/users/extra").is_none());
    assert!(router.resolve("/admin").is_none());
}

#[test]
fn test_wildcard_matches_any_suffix_including_none() {
    let (router, _document) = router("/");
    router.add_route("/admin/*", "admin", RouteOptions::new());

    for path in ["/admin", "/admin/", "/admin/anything/nested"] {
        let matched = router.resolve(path);
        assert_eq!(
            matched.map(|m| m.route.view_id().to_string()),
            Some("admin".to_string()),
            "{} should match /admin/*",
            path
        );
    }
    assert!(router.resolve("/administrator").is_none());
}

#[test]
fn test_parameter_binds_one_segment() {
    let (router, _document) = router("/");
    router.add_route("/admin/user/:id", "user", RouteOptions::new());

    let matched = router.resolve("/admin/user/42").unwrap();
    assert_eq!(matched.params.get("id"), Some(&"42".to_string()));
    assert!(router.resolve("/admin/user/42/edit").is_none());
    assert!(router.resolve("/admin/user").is_none());
}

#[test]
fn test_first_match_wins() {
    let (router, document) = router("/");
    document.add_view("a-view");
    document.add_view("b-view");
    router.add_route("/a/*", "a", RouteOptions::new());
    router.add_route("/a/b", "b", RouteOptions::new());
    let events = record_events(&router);

    assert_eq!(router.resolve("/a/b").unwrap().route.view_id(), "a");

    router.navigate("/a/b", false);
    assert_eq!(events.borrow()[0].view_id, "a");
    assert_eq!(document.is_hidden("a-view"), Some(false));
    assert_eq!(document.is_hidden("b-view"), Some(true));
}

#[test]
fn test_query_stripped_for_matching_only() {
    let (router, document) = router("/");
    club_routes_minimal(&router);
    let events = record_events(&router);

    router.navigate("/events?tag=climbing&page=2", false);

    let event = events.borrow()[0].clone();
    assert_eq!(event.resolved_path, "/events");
    assert_eq!(event.path, "/events?tag=climbing&page=2");
    assert_eq!(document.current(), "/events?tag=climbing&page=2");

    // A different query is a different location
    assert!(router.navigate("/events?tag=sailing", false).is_success());
    assert_eq!(events.borrow().len(), 2);
}

fn club_routes_minimal(router: &Router) {
    router.add_route("/events", "events", RouteOptions::new());
    router.add_route("/event/:id", "event", RouteOptions::new().overlay());
}

// ============================================================================
// View switching
// ============================================================================

#[test]
fn test_idempotent_renavigation() {
    let (router, document) = router("/");
    club_routes_minimal(&router);
    let events = record_events(&router);

    router.navigate("/events", false);
    let second = router.navigate("/events", false);

    assert!(second.is_unchanged());
    assert_eq!(events.borrow().len(), 1);
    assert_eq!(document.pushes(), vec!["/events".to_string()]);
}

#[test]
fn test_fragment_does_not_make_a_new_location() {
    let (router, document) = router("/");
    club_routes_minimal(&router);
    let events = record_events(&router);

    router.navigate("/events", false);
    let again = router.navigate("/events#upcoming", false);

    assert!(again.is_unchanged());
    assert_eq!(events.borrow().len(), 1);
    assert_eq!(document.pushes(), vec!["/events".to_string()]);
}

#[test]
fn test_overlay_stacks_over_base_view() {
    let (router, document) = router("/");
    club_routes_minimal(&router);

    router.navigate("/events", false);
    router.navigate("/event/7", false);

    assert_eq!(document.is_hidden("events-view"), Some(false));
    assert_eq!(document.is_hidden("event-view"), Some(false));
    assert_eq!(document.is_hidden("profile-view"), Some(true));
}

#[test]
fn test_renavigating_overlay_keeps_base_view() {
    let (router, document) = router("/");
    club_routes_minimal(&router);

    router.navigate("/events", false);
    router.navigate("/event/7", false);
    router.navigate("/event/7", true);
    router.navigate("/event/8", false);

    assert_eq!(document.is_hidden("events-view"), Some(false));
    assert_eq!(document.is_hidden("event-view"), Some(false));
}

#[test]
fn test_base_view_replaces_overlay() {
    let (router, document) = router("/");
    club_routes_minimal(&router);
    router.add_route("/profile", "profile", RouteOptions::new());

    router.navigate("/events", false);
    router.navigate("/event/7", false);
    router.navigate("/profile", false);

    assert_eq!(document.visible_views(), vec!["profile-view".to_string()]);
}

#[tokio::test]
async fn test_profile_end_to_end() {
    let h = harness("/");
    let events = record_events(h.router());

    let result = h.router().switch_view("/profile", false).await;

    assert!(result.is_success());
    assert_eq!(h.document.is_hidden("profile-view"), Some(false));
    let expected_hidden: Vec<String> = VIEWS
        .iter()
        .filter(|id| **id != "profile-view")
        .map(|id| id.to_string())
        .collect();
    assert_eq!(hidden_views(&h.document), expected_hidden);
    assert_eq!(h.document.current(), "/profile");
    assert_eq!(
        *events.borrow(),
        vec![NavigationEvent {
            resolved_path: "/profile".to_string(),
            view_id: "profile".to_string(),
            path: "/profile".to_string(),
        }]
    );
    assert_eq!(h.document.title(), "Profile");
}

#[tokio::test]
async fn test_unknown_path_shows_error_view() {
    let h = harness("/events");
    let events = record_events(h.router());

    let result = h.router().switch_view("/nope/nothing", false).await;

    assert!(result.is_redirected());
    assert_eq!(result.final_path(), Some("/404"));
    assert_eq!(h.document.visible_views(), vec!["404-view".to_string()]);
    assert_eq!(events.borrow()[0].view_id, "404");
}

#[tokio::test]
async fn test_relative_path_is_normalized() {
    let h = harness("/");
    let result = h.router().switch_view("events", false).await;
    assert_eq!(result.final_path(), Some("/events"));
}

// ============================================================================
// Root redirect and browser integration
// ============================================================================

#[tokio::test]
async fn test_root_redirect_uses_auth_status() {
    let h = harness("/");
    h.transport
        .respond_to("/api/auth/status", 200, r#"{"authenticated":true}"#);

    let result = h.app.start().await;

    assert_eq!(
        result,
        NavigationResult::Redirected {
            from: "/".to_string(),
            to: "/events".to_string(),
        }
    );
    assert_eq!(h.document.visible_views(), vec!["events-view".to_string()]);
}

#[tokio::test]
async fn test_root_redirect_anonymous() {
    let h = harness("/");
    h.transport.respond_to("/api/auth/status", 401, "");

    h.app.start().await;
    assert_eq!(h.document.current(), "/login");
}

#[tokio::test]
async fn test_popstate_resyncs_views() {
    let h = harness("/");
    let router = h.router();
    router.switch_view("/events", false).await;
    router.switch_view("/profile", false).await;

    h.document.back();
    let result = router.handle_popstate().await;

    assert!(result.is_success());
    assert_eq!(h.document.visible_views(), vec!["events-view".to_string()]);
}

#[tokio::test]
async fn test_follow_link() {
    let h = harness("/events");
    h.router().follow_link("/admin/roles").await;
    assert_eq!(h.document.visible_views(), vec!["admin-view".to_string()]);
}

#[tokio::test]
async fn test_overlay_close_round_trip() {
    let h = harness("/");
    let router = h.router();
    router.switch_view("/events", false).await;
    router.switch_view("/event/3", false).await;
    assert_eq!(h.document.title(), "Event");

    let outcome = router.close_modal("/events").await;
    assert!(matches!(outcome, CloseOutcome::HistoryBack { .. }));

    router.handle_popstate().await;
    assert_eq!(h.document.visible_views(), vec!["events-view".to_string()]);
    assert_eq!(h.document.current(), "/events");
}

#[test]
fn test_every_route_has_one_container() {
    let h = harness("/");
    assert!(h.router().missing_views().is_empty());
}

#[cfg(feature = "cache")]
#[test]
fn test_resolution_cache_hits() {
    let (router, _document) = router("/");
    club_routes_minimal(&router);

    router.resolve("/event/1");
    router.resolve("/event/1?x=1");
    router.resolve("/event/1");

    let stats = router.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);

    router.add_route("/profile", "profile", RouteOptions::new());
    assert_eq!(router.cache_stats().invalidations, stats.invalidations + 1);
}
