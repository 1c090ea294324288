//! Seams between the routing engine and the page it drives.
//!
//! The router, connection monitor and notifier never touch the DOM or the
//! History API directly. They talk to these traits, implemented by
//! [`WebDocument`](crate::web::WebDocument) in the browser (feature `web`)
//! and by the in-memory stand-ins in [`memory`](crate::memory) everywhere
//! else.
//!
//! View containers are addressed by element id (`<viewId>-view`); the router
//! adds the suffix.

use crate::transition::Transition;
use futures::future::LocalBoxFuture;
use web_time::Instant;

/// Access to the routable view containers.
pub trait ViewHost {
    /// Element ids of every routable view container, in document order.
    fn view_ids(&self) -> Vec<String>;

    /// Number of containers carrying `element_id`.
    fn count_views(&self, element_id: &str) -> usize {
        self.view_ids().iter().filter(|id| *id == element_id).count()
    }

    /// Hide or reveal a container. Returns `false` if it does not exist.
    fn set_hidden(&self, element_id: &str, hidden: bool) -> bool;

    /// Visibility of a container, `None` if it does not exist.
    fn is_hidden(&self, element_id: &str) -> Option<bool>;

    /// Set the document title.
    fn set_title(&self, title: &str);

    /// Play a closing transition; the future resolves when it has ended.
    fn play_transition(
        &self,
        element_id: &str,
        transition: Transition,
    ) -> LocalBoxFuture<'static, ()>;
}

/// The browser location and session history.
pub trait BrowserLocation {
    /// Current path including the query string (`pathname + search`).
    fn current(&self) -> String;

    /// Push `path` onto the session history without reloading.
    fn push_state(&self, path: &str);

    /// Native back navigation. The host reports the resulting location
    /// change through its popstate hook.
    fn back(&self);
}

/// Monotonic time source.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by `web_time::Instant` (performance.now() in the browser).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
