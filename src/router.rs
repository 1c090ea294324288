//! The router / view engine.
//!
//! [`Router`] owns the route registry and applies navigations to the page:
//!
//! 1. Normalize the path. The bare root is a special case: it asks the
//!    [`AuthCheck`] and redirects to one of two configured paths.
//! 2. Do nothing if the path (query included) is the current location and
//!    the switch is not forced.
//! 3. Resolve the path with its query stripped, first match wins. A miss
//!    redirects to the error route.
//! 4. Push the path onto the browser history and the [`HistoryStack`].
//! 5. Reveal the route's view container. Base views hide every other
//!    container; overlays leave them alone.
//! 6. Broadcast a [`NavigationEvent`].
//! 7. Set the document title.
//!
//! Every navigation takes a sequence number. The root redirect waits on the
//! network, so when it resumes it checks that no newer navigation started
//! meanwhile and gives up with [`NavigationResult::Superseded`] if one did.
//!
//! # Example
//!
//! ```
//! use club_navigator::host::ViewHost;
//! use club_navigator::memory::MemoryDocument;
//! use club_navigator::{Router, RouterConfig, RouteOptions};
//! use std::rc::Rc;
//!
//! let document = Rc::new(MemoryDocument::new("/"));
//! document.add_view("events-view");
//! document.add_view("event-view");
//!
//! let router = Router::new(RouterConfig::default(), document.clone(), document.clone());
//! router.add_route("/events", "events", RouteOptions::new());
//! router.add_route("/event/:id", "event", RouteOptions::new().overlay());
//!
//! router.navigate("/events", false);
//! router.navigate("/event/7", false);
//!
//! assert_eq!(document.is_hidden("events-view"), Some(false));
//! assert_eq!(document.is_hidden("event-view"), Some(false));
//! ```

use crate::auth::AuthCheck;
#[cfg(feature = "cache")]
use crate::cache::CacheStats;
use crate::config::RouterConfig;
use crate::error::{NavigationError, NavigationResult};
use crate::event_bus::{EventBus, Subscription};
use crate::history::HistoryStack;
use crate::host::{BrowserLocation, ViewHost};
use crate::params::QueryParams;
use crate::resolve::{
    default_title, is_root, normalize_path, plan_visibility, split_path_and_query, RouteMatch,
};
use crate::route::{Route, RouteOptions};
use crate::state::RouterState;
use crate::{debug_log, info_log, trace_log, warn_log};
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

// ============================================================================
// Events and outcomes
// ============================================================================

/// Broadcast after every applied view switch.
///
/// Parameters are not included; subscribers that need them re-derive them
/// from `path` (or call [`Router::resolve`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    /// Pattern of the matched route, e.g. `/event/:id`
    pub resolved_path: String,
    /// View id of the matched route
    pub view_id: String,
    /// Navigated path including its query string
    pub path: String,
}

/// How an overlay was dismissed by [`Router::close_modal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// A `back`/`return` query parameter named the target.
    ReturnParam {
        target: String,
        result: NavigationResult,
    },
    /// The logical history had an entry; native back navigation was issued.
    HistoryBack { previous: String },
    /// Neither applied; the fallback path was navigated to.
    Fallback { result: NavigationResult },
}

// ============================================================================
// Router
// ============================================================================

struct RouterInner {
    config: RouterConfig,
    state: RefCell<RouterState>,
    views: Rc<dyn ViewHost>,
    location: Rc<dyn BrowserLocation>,
    auth: RefCell<Option<Rc<dyn AuthCheck>>>,
    events: EventBus<NavigationEvent>,
}

/// Route registry plus the view-switching engine.
///
/// Cloning yields another handle to the same router.
#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

/// Non-owning handle to a [`Router`], for callbacks the router itself keeps
/// alive.
#[derive(Clone)]
pub struct WeakRouter {
    inner: Weak<RouterInner>,
}

impl WeakRouter {
    /// The router, if it still exists.
    pub fn upgrade(&self) -> Option<Router> {
        self.inner.upgrade().map(|inner| Router { inner })
    }
}

impl fmt::Debug for WeakRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRouter")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Router {
    /// Create a router for the page behind `views` and `location`.
    ///
    /// The logical history is seeded with the current location.
    pub fn new(
        config: RouterConfig,
        views: Rc<dyn ViewHost>,
        location: Rc<dyn BrowserLocation>,
    ) -> Self {
        let initial = location.current();
        Self {
            inner: Rc::new(RouterInner {
                config,
                state: RefCell::new(RouterState::new(initial)),
                views,
                location,
                auth: RefCell::new(None),
                events: EventBus::new(),
            }),
        }
    }

    /// Use `auth` for the root redirect. Without one, the root always goes
    /// to the anonymous target.
    pub fn set_auth_check(&self, auth: Rc<dyn AuthCheck>) {
        *self.inner.auth.borrow_mut() = Some(auth);
    }

    /// A handle that does not keep the router alive.
    pub fn downgrade(&self) -> WeakRouter {
        WeakRouter {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Router configuration
    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register `pattern` for `view_id`.
    pub fn add_route(&self, pattern: &str, view_id: &str, options: RouteOptions) {
        self.add(Route::with_options(pattern, view_id, options));
    }

    /// Register a built [`Route`].
    pub fn add(&self, route: Route) {
        info_log!(
            "Registered route '{}' -> '{}'{}",
            route.pattern(),
            route.view_id(),
            if route.is_overlay() { " (overlay)" } else { "" }
        );
        self.inner.state.borrow_mut().add_route(route);
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> Vec<Rc<Route>> {
        self.inner.state.borrow().routes().to_vec()
    }

    /// Resolve `path` without navigating.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        self.inner.state.borrow_mut().resolve(&normalize_path(path))
    }

    /// Routes whose view id does not have exactly one container.
    pub fn missing_views(&self) -> Vec<NavigationError> {
        let mut problems: Vec<NavigationError> = Vec::new();
        for route in self.routes() {
            let view_id = route.view_id();
            let seen = problems.iter().any(|problem| {
                matches!(
                    problem,
                    NavigationError::MissingView { view_id: seen, .. } if seen == view_id
                )
            });
            if seen {
                continue;
            }
            let containers = self
                .inner
                .views
                .count_views(&self.inner.config.element_id(view_id));
            if containers != 1 {
                problems.push(NavigationError::MissingView {
                    view_id: view_id.to_string(),
                    containers,
                });
            }
        }
        problems
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Switch to `path`, including the root redirect.
    ///
    /// Only the root redirect actually waits; every other path is applied
    /// before this returns and the future is already complete.
    pub fn switch_view(
        &self,
        path: &str,
        force: bool,
    ) -> LocalBoxFuture<'static, NavigationResult> {
        let path = normalize_path(path);
        if !is_root(&path) {
            return future::ready(self.navigate(&path, force)).boxed_local();
        }

        let nav_id = self.inner.state.borrow_mut().start_navigation();
        let auth = self.inner.auth.borrow().clone();
        let check = auth.map(|auth| auth.is_authenticated());
        let router = self.clone();
        debug_log!("Root path requested, checking session (navigation #{})", nav_id);

        async move {
            let authenticated = match check {
                Some(check) => check.await,
                None => false,
            };
            if !router.inner.state.borrow().is_navigation_current(nav_id) {
                debug_log!("Root redirect #{} superseded by a newer navigation", nav_id);
                return NavigationResult::Superseded { path };
            }

            let redirect = &router.inner.config.root_redirect;
            let target = if authenticated {
                redirect.authenticated.clone()
            } else {
                redirect.anonymous.clone()
            };
            match router.navigate(&target, force) {
                NavigationResult::Success { path: to } => {
                    NavigationResult::Redirected { from: path, to }
                }
                other => other,
            }
        }
        .boxed_local()
    }

    /// Apply a navigation to `path` now.
    ///
    /// The root path is routed like any other path here; use
    /// [`switch_view`](Self::switch_view) for the redirect.
    pub fn navigate(&self, path: &str, force: bool) -> NavigationResult {
        let path = normalize_path(path);
        let nav_id = self.inner.state.borrow_mut().start_navigation();
        trace_log!("Navigation #{} to '{}'", nav_id, path);
        self.apply(&path, force, true)
    }

    /// Force a re-render of the current location.
    pub fn reload(&self) -> NavigationResult {
        let current = self.inner.location.current();
        debug_log!("Reloading '{}'", current);
        self.navigate(&current, true)
    }

    /// Resync the visible views with the browser location, after a
    /// `popstate` or on initial load.
    pub fn sync_with_location(&self) -> LocalBoxFuture<'static, NavigationResult> {
        let current = self.inner.location.current();
        self.switch_view(&current, true)
    }

    /// Browser back/forward.
    pub fn handle_popstate(&self) -> LocalBoxFuture<'static, NavigationResult> {
        trace_log!("popstate");
        self.sync_with_location()
    }

    /// Follow a clicked navigation link.
    pub fn follow_link(&self, target: &str) -> LocalBoxFuture<'static, NavigationResult> {
        self.switch_view(target, false)
    }

    /// Dismiss the current overlay.
    ///
    /// Plays the closing transition, then resolves in exactly one way:
    /// a `back`/`return` query parameter, else native back navigation when
    /// the logical history has an entry, else `fallback`.
    pub fn close_modal(&self, fallback: &str) -> LocalBoxFuture<'static, CloseOutcome> {
        let current = self.inner.location.current();
        let transition = self.inner.config.close_transition;
        let overlay_element = self
            .resolve(&current)
            .filter(|matched| matched.route.is_overlay())
            .map(|matched| self.inner.config.element_id(matched.route.view_id()));

        let animation = match overlay_element {
            Some(element_id) if !transition.is_none() => {
                self.inner.views.play_transition(&element_id, transition)
            }
            _ => future::ready(()).boxed_local(),
        };

        let router = self.clone();
        let fallback = normalize_path(fallback);
        async move {
            animation.await;
            router.finish_close(&current, &fallback).await
        }
        .boxed_local()
    }

    async fn finish_close(&self, current: &str, fallback: &str) -> CloseOutcome {
        // Step 1: explicit return target
        let (_, query) = split_path_and_query(current);
        let query = QueryParams::from_query_string(query);
        let keys: Vec<&str> = self
            .inner
            .config
            .return_params
            .iter()
            .map(String::as_str)
            .collect();
        if let Some(target) = query.first_of(&keys).filter(|target| is_local_path(target)) {
            let target = target.to_string();
            debug_log!("Closing overlay, returning to '{}'", target);
            let result = self.switch_view(&target, false).await;
            return CloseOutcome::ReturnParam { target, result };
        }

        // Step 2: logical history
        let previous = self.inner.state.borrow_mut().history_mut().pop_previous();
        if let Some(previous) = previous {
            debug_log!("Closing overlay, going back to '{}'", previous);
            self.inner.location.back();
            return CloseOutcome::HistoryBack { previous };
        }

        // Step 3: fallback
        debug_log!("Closing overlay, falling back to '{}'", fallback);
        let result = self.switch_view(fallback, false).await;
        CloseOutcome::Fallback { result }
    }

    /// Steps 2-7 of a navigation. `allow_error_route` is cleared for the
    /// error route itself, so a miss there ends the recursion.
    fn apply(&self, path: &str, force: bool, allow_error_route: bool) -> NavigationResult {
        let current = self.inner.location.current();
        if !force && path == current {
            debug_log!("Already at '{}', nothing to do", path);
            return NavigationResult::Unchanged {
                path: path.to_string(),
            };
        }

        let resolved = self.inner.state.borrow_mut().resolve(path);
        let Some(matched) = resolved else {
            return self.route_miss(path, force, allow_error_route);
        };
        info_log!(
            "Navigating to '{}' (route '{}')",
            path,
            matched.route.pattern()
        );

        if path != current {
            self.inner.location.push_state(path);
        }
        self.inner
            .state
            .borrow_mut()
            .history_mut()
            .record_transition(path);

        let route = matched.route;
        let target = self.inner.config.element_id(route.view_id());
        let plan = plan_visibility(&target, route.is_overlay(), &self.inner.views.view_ids());
        for element_id in &plan.hide {
            self.inner.views.set_hidden(element_id, true);
        }
        if !self.inner.views.set_hidden(&plan.show, false) {
            warn_log!(
                "No view container '{}' for route '{}'",
                plan.show,
                route.pattern()
            );
        }

        self.inner.events.notify(&NavigationEvent {
            resolved_path: route.pattern().to_string(),
            view_id: route.view_id().to_string(),
            path: path.to_string(),
        });

        let title = route
            .title_for(path)
            .unwrap_or_else(|| default_title(path));
        let title = match &self.inner.config.title_suffix {
            Some(suffix) => format!("{} | {}", title, suffix),
            None => title,
        };
        self.inner.views.set_title(&title);

        NavigationResult::Success {
            path: path.to_string(),
        }
    }

    fn route_miss(&self, path: &str, force: bool, allow_error_route: bool) -> NavigationResult {
        let error_path = self.inner.config.error_path.clone();
        if !allow_error_route || split_path_and_query(path).0 == error_path {
            warn_log!("No route matches '{}'", path);
            return NavigationResult::NotFound {
                path: path.to_string(),
            };
        }

        warn_log!("No route matches '{}', showing '{}'", path, error_path);
        match self.apply(&error_path, force, false) {
            NavigationResult::Success { path: to } | NavigationResult::Unchanged { path: to } => {
                NavigationResult::Redirected {
                    from: path.to_string(),
                    to,
                }
            }
            other => other,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current browser location (path and query).
    pub fn current_path(&self) -> String {
        self.inner.location.current()
    }

    /// Snapshot of the logical history.
    pub fn history(&self) -> HistoryStack {
        self.inner.state.borrow().history().clone()
    }

    /// Check if overlay dismissal would go back in history
    pub fn can_go_back(&self) -> bool {
        self.inner.state.borrow().history().has_previous()
    }

    /// The navigation event channel.
    pub fn events(&self) -> EventBus<NavigationEvent> {
        self.inner.events.clone()
    }

    /// Subscribe to navigation events.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&NavigationEvent) + 'static,
    {
        self.inner.events.subscribe_fn(callback)
    }

    /// Route resolution cache statistics
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.state.borrow().cache_stats().clone()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.inner.config)
            .field("state", &*self.inner.state.borrow())
            .field("subscribers", &self.inner.events.len())
            .finish_non_exhaustive()
    }
}

/// Same-origin path: starts with one `/`, not `//host`.
fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//")
}
