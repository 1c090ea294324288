//! Router state management

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, ResolutionCache};
use crate::history::HistoryStack;
#[cfg(feature = "cache")]
use crate::resolve::split_path_and_query;
use crate::resolve::{resolve_route, RouteMatch};
use crate::route::Route;
use std::rc::Rc;

/// Mutable state behind a [`Router`](crate::Router): the route registry, the
/// logical history and the navigation sequence counter.
#[derive(Debug)]
pub struct RouterState {
    /// Registered routes, in registration order
    routes: Vec<Rc<Route>>,
    /// Logical history used by overlay dismissal
    history: HistoryStack,
    /// Pathname → route index
    #[cfg(feature = "cache")]
    cache: ResolutionCache,
    /// Incremented by every navigation so a pending one can tell it was
    /// overtaken
    navigation_id: u64,
}

impl RouterState {
    /// Create state seeded with the location the page was loaded at.
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            routes: Vec::new(),
            history: HistoryStack::new(initial_path),
            #[cfg(feature = "cache")]
            cache: ResolutionCache::new(),
            navigation_id: 0,
        }
    }

    /// Get current navigation ID
    pub fn navigation_id(&self) -> u64 {
        self.navigation_id
    }

    /// Start a new navigation and return its ID.
    ///
    /// Any navigation holding an older ID is stale from now on.
    pub fn start_navigation(&mut self) -> u64 {
        self.navigation_id += 1;
        self.navigation_id
    }

    /// Check if a navigation is still current (not overtaken by a newer one)
    pub fn is_navigation_current(&self, nav_id: u64) -> bool {
        self.navigation_id == nav_id
    }

    /// Register a route
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(Rc::new(route));
        #[cfg(feature = "cache")]
        self.cache.clear();
    }

    /// Get all registered routes
    pub fn routes(&self) -> &[Rc<Route>] {
        &self.routes
    }

    /// Resolve a path (query ignored), first match wins.
    #[cfg(feature = "cache")]
    pub fn resolve(&mut self, path: &str) -> Option<RouteMatch> {
        let (pathname, _) = split_path_and_query(path);
        if let Some(cached) = self.cache.get(pathname) {
            let index = cached?;
            let route = Rc::clone(self.routes.get(index)?);
            let params = route.captures(pathname).unwrap_or_default();
            return Some(RouteMatch {
                index,
                route,
                params,
            });
        }
        let resolved = resolve_route(&self.routes, path);
        self.cache
            .insert(pathname.to_string(), resolved.as_ref().map(|m| m.index));
        resolved
    }

    /// Resolve a path (query ignored), first match wins.
    #[cfg(not(feature = "cache"))]
    pub fn resolve(&mut self, path: &str) -> Option<RouteMatch> {
        resolve_route(&self.routes, path)
    }

    /// Logical history
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Logical history (mutable)
    pub fn history_mut(&mut self) -> &mut HistoryStack {
        &mut self.history
    }

    /// Resolution cache statistics
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }
}

impl Default for RouterState {
    fn default() -> Self {
        Self::new("/")
    }
}
