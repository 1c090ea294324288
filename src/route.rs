//! Route definitions.
//!
//! A [`Route`] maps a pattern to the id of a view container. Routes are
//! registered once at start-up and never change afterwards.
//!
//! ```
//! use club_navigator::Route;
//!
//! let route = Route::new("/event/:id", "event")
//!     .overlay()
//!     .title(|path| format!("Event {}", path.rsplit('/').next().unwrap_or("")));
//!
//! assert!(route.is_overlay());
//! assert!(route.matches("/event/7"));
//! assert_eq!(route.title_for("/event/7").as_deref(), Some("Event 7"));
//! ```

use crate::matching::CompiledPattern;
use crate::params::RouteParams;
use std::fmt;
use std::rc::Rc;

/// Custom document-title strategy. Receives the navigated path (with query).
pub type TitleFn = Rc<dyn Fn(&str) -> String>;

/// Per-route options for [`Router::add_route`](crate::Router::add_route).
#[derive(Clone, Default)]
pub struct RouteOptions {
    /// Show above the current view instead of replacing it
    pub overlay: bool,
    /// Custom title strategy
    pub title: Option<TitleFn>,
}

impl RouteOptions {
    /// Default options: base view, derived title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the route as an overlay.
    pub fn overlay(mut self) -> Self {
        self.overlay = true;
        self
    }

    /// Use a custom title strategy.
    pub fn title<F>(mut self, title: F) -> Self
    where
        F: Fn(&str) -> String + 'static,
    {
        self.title = Some(Rc::new(title));
        self
    }
}

impl fmt::Debug for RouteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteOptions")
            .field("overlay", &self.overlay)
            .field("title", &self.title.is_some())
            .finish()
    }
}

/// A registered pattern → view mapping.
#[derive(Clone)]
pub struct Route {
    matcher: CompiledPattern,
    view_id: String,
    options: RouteOptions,
}

impl Route {
    /// Create a base-view route with a derived title.
    pub fn new(pattern: impl AsRef<str>, view_id: impl Into<String>) -> Self {
        Self::with_options(pattern, view_id, RouteOptions::default())
    }

    /// Create a route from explicit options.
    pub fn with_options(
        pattern: impl AsRef<str>,
        view_id: impl Into<String>,
        options: RouteOptions,
    ) -> Self {
        Self {
            matcher: CompiledPattern::compile(pattern.as_ref()),
            view_id: view_id.into(),
            options,
        }
    }

    /// Mark the route as an overlay.
    pub fn overlay(mut self) -> Self {
        self.options.overlay = true;
        self
    }

    /// Use a custom title strategy.
    pub fn title<F>(mut self, title: F) -> Self
    where
        F: Fn(&str) -> String + 'static,
    {
        self.options.title = Some(Rc::new(title));
        self
    }

    /// The pattern text as registered.
    pub fn pattern(&self) -> &str {
        self.matcher.as_str()
    }

    /// Compiled matcher.
    pub fn matcher(&self) -> &CompiledPattern {
        &self.matcher
    }

    /// Id of the view container (without the `-view` suffix).
    pub fn view_id(&self) -> &str {
        &self.view_id
    }

    /// Whether the route stacks above the current view.
    pub fn is_overlay(&self) -> bool {
        self.options.overlay
    }

    /// Anchored match against a path without query string.
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Match and capture parameters.
    pub fn captures(&self, path: &str) -> Option<RouteParams> {
        self.matcher.captures(path)
    }

    /// Title from the custom strategy, if the route has one.
    pub fn title_for(&self, path: &str) -> Option<String> {
        self.options.title.as_ref().map(|title| title(path))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.matcher.as_str())
            .field("view_id", &self.view_id)
            .field("overlay", &self.options.overlay)
            .field("custom_title", &self.options.title.is_some())
            .finish()
    }
}
