//! Pure route resolution.
//!
//! Everything the router decides before touching the page lives here, as
//! functions over plain data:
//!
//! 1. [`normalize_path`]: make the path absolute, without its fragment.
//! 2. [`split_path_and_query`]: strip the query (and fragment) for matching.
//! 3. [`resolve_route`]: first registered route whose pattern matches wins.
//! 4. [`plan_visibility`]: which view containers to show and hide.
//! 5. [`default_title`]: title derived from the first path segment.
//!
//! The [`Router`](crate::Router) applies the result through a
//! [`ViewHost`](crate::host::ViewHost), so this module is testable without a
//! DOM.
//!
//! # Example
//!
//! ```
//! use club_navigator::resolve::{plan_visibility, resolve_route};
//! use club_navigator::Route;
//! use std::rc::Rc;
//!
//! let routes = vec![
//!     Rc::new(Route::new("/events", "events")),
//!     Rc::new(Route::new("/event/:id", "event").overlay()),
//! ];
//!
//! let matched = resolve_route(&routes, "/event/7?tab=2").unwrap();
//! assert_eq!(matched.route.view_id(), "event");
//!
//! let views = vec!["events-view".to_string(), "event-view".to_string()];
//! let plan = plan_visibility("event-view", matched.route.is_overlay(), &views);
//! assert_eq!(plan.show, "event-view");
//! assert!(plan.hide.is_empty());
//! ```

use crate::matching::split_path;
use crate::params::RouteParams;
use crate::route::Route;
use std::rc::Rc;

/// A route selected for a path.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Position of the route in registration order
    pub index: usize,
    /// The matched route
    pub route: Rc<Route>,
    /// Values captured by `:name` segments
    pub params: RouteParams,
}

/// View containers to show and hide for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityPlan {
    /// Element id to reveal
    pub show: String,
    /// Element ids to hide (empty for overlays)
    pub hide: Vec<String>,
}

/// Make `path` absolute and drop any `#fragment`. An empty path is the root.
///
/// The fragment never reaches the router's location, so `/events#top` and
/// `/events` are the same place.
pub fn normalize_path(path: &str) -> String {
    let path = path.split_once('#').map_or(path, |(before, _)| before);
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Split a navigable path into `(pathname, query)`.
///
/// The query is returned without its `?`; a `#fragment` is dropped from
/// both parts.
pub fn split_path_and_query(path: &str) -> (&str, &str) {
    let without_fragment = path.split_once('#').map_or(path, |(before, _)| before);
    without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""))
}

/// Check if a path (query ignored) is the bare root.
pub fn is_root(path: &str) -> bool {
    split_path(split_path_and_query(path).0).is_empty()
}

/// Resolve `path` against `routes`, first match wins.
///
/// Registration order is the only precedence rule: a broad pattern
/// registered before a narrow one shadows it.
pub fn resolve_route(routes: &[Rc<Route>], path: &str) -> Option<RouteMatch> {
    let (pathname, _) = split_path_and_query(path);
    routes.iter().enumerate().find_map(|(index, route)| {
        route.captures(pathname).map(|params| RouteMatch {
            index,
            route: Rc::clone(route),
            params,
        })
    })
}

/// Decide view visibility.
///
/// `target` is always shown. For a base view every other container is
/// hidden; an overlay leaves the rest untouched so it stacks above whatever
/// is already visible.
pub fn plan_visibility(target: &str, overlay: bool, all_views: &[String]) -> VisibilityPlan {
    let hide = if overlay {
        Vec::new()
    } else {
        all_views
            .iter()
            .filter(|id| id.as_str() != target)
            .cloned()
            .collect()
    };

    VisibilityPlan {
        show: target.to_string(),
        hide,
    }
}

/// Title derived from the first path segment, capitalized.
///
/// `/admin/users?tab=1` gives `Admin`; the root gives `Home`.
pub fn default_title(path: &str) -> String {
    let (pathname, _) = split_path_and_query(path);
    split_path(pathname)
        .first()
        .map_or_else(|| "Home".to_string(), |segment| capitalize(segment))
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
