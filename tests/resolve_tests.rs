//! Route table resolution, visibility planning and titles.
//!
//! Everything here is plain data, no page host involved.

use club_navigator::resolve::*;
use club_navigator::{HistoryStack, Route};
use std::rc::Rc;

fn club_table() -> Vec<Rc<Route>> {
    vec![
        Rc::new(Route::new("/login", "login")),
        Rc::new(Route::new("/events", "events")),
        Rc::new(Route::new("/event/:id", "event").overlay()),
        Rc::new(Route::new("/admin/user/:id", "admin-user")),
        Rc::new(Route::new("/admin/*", "admin")),
        Rc::new(Route::new("/404", "404")),
    ]
}

fn views() -> Vec<String> {
    ["login", "events", "event", "admin-user", "admin", "404"]
        .iter()
        .map(|id| format!("{}-view", id))
        .collect()
}

// ---- resolve_route ----

#[test]
fn test_flat_routes() {
    let routes = club_table();

    let matched = resolve_route(&routes, "/events").unwrap();
    assert_eq!(matched.route.view_id(), "events");
    assert_eq!(matched.index, 1);
    assert!(matched.params.is_empty());
}

#[test]
fn test_parameter_capture() {
    let routes = club_table();

    let matched = resolve_route(&routes, "/event/42?tab=photos").unwrap();
    assert_eq!(matched.route.view_id(), "event");
    assert_eq!(matched.params.get("id"), Some(&"42".to_string()));
    assert_eq!(matched.params.get_as::<u32>("id"), Some(42));
}

#[test]
fn test_specific_route_before_wildcard() {
    let routes = club_table();

    assert_eq!(
        resolve_route(&routes, "/admin/user/9").unwrap().route.view_id(),
        "admin-user"
    );
    assert_eq!(
        resolve_route(&routes, "/admin/user/9/roles")
            .unwrap()
            .route
            .view_id(),
        "admin"
    );
    assert_eq!(
        resolve_route(&routes, "/admin").unwrap().route.view_id(),
        "admin"
    );
}

#[test]
fn test_fragment_is_ignored() {
    let routes = club_table();
    let matched = resolve_route(&routes, "/events#upcoming").unwrap();
    assert_eq!(matched.route.view_id(), "events");
}

#[test]
fn test_unknown_path() {
    let routes = club_table();
    assert!(resolve_route(&routes, "/eventsx").is_none());
    assert!(resolve_route(&routes, "/event").is_none());
    assert!(resolve_route(&[], "/events").is_none());
}

// ---- path helpers ----

#[test]
fn test_path_helpers() {
    assert_eq!(normalize_path("admin/users"), "/admin/users");
    assert_eq!(normalize_path(""), "/");
    assert_eq!(
        split_path_and_query("/events?tag=run&page=2#top"),
        ("/events", "tag=run&page=2")
    );
    assert!(is_root("/?from=mail"));
    assert!(!is_root("/events"));
}

// ---- plan_visibility ----

#[test]
fn test_base_view_plan() {
    let plan = plan_visibility("events-view", false, &views());

    assert_eq!(plan.show, "events-view");
    assert_eq!(plan.hide.len(), views().len() - 1);
    assert!(!plan.hide.contains(&"events-view".to_string()));
}

#[test]
fn test_overlay_plan_hides_nothing() {
    let plan = plan_visibility("event-view", true, &views());
    assert_eq!(plan.show, "event-view");
    assert!(plan.hide.is_empty());
}

#[test]
fn test_unregistered_container_still_shown() {
    let plan = plan_visibility("orphan-view", false, &views());
    assert_eq!(plan.show, "orphan-view");
    assert_eq!(plan.hide, views());
}

// ---- titles ----

#[test]
fn test_titles() {
    assert_eq!(default_title("/events?page=3"), "Events");
    assert_eq!(default_title("/admin/user/7"), "Admin");
    assert_eq!(default_title("/"), "Home");

    let route = Route::new("/event/:id", "event").title(|path| format!("Event {}", path));
    assert_eq!(route.title_for("/event/1"), Some("Event /event/1".to_string()));
    assert_eq!(Route::new("/events", "events").title_for("/events"), None);
}

// ---- history ----

#[test]
fn test_history_never_contains_current() {
    let mut history = HistoryStack::new("/events");
    history.record_transition("/event/1");
    history.record_transition("/events");

    assert_eq!(history.current_path(), "/events");
    assert_eq!(history.peek_previous(), Some("/event/1"));
    assert_eq!(history.len(), 1);

    assert_eq!(history.pop_previous(), Some("/event/1".to_string()));
    assert_eq!(history.current_path(), "/event/1");
    assert!(!history.has_previous());
    assert_eq!(history.pop_previous(), None);
}
