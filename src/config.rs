//! Construction-time configuration.
//!
//! Nothing is read from files or the environment: the application builds
//! these structs at start-up (usually from their `Default`s plus a few
//! builder calls) and hands them to the components it wires together.
//!
//! ```
//! use club_navigator::config::{ConnectionConfig, RouterConfig};
//! use std::time::Duration;
//!
//! let router = RouterConfig::default()
//!     .error_path("/not-found")
//!     .title_suffix("Club");
//! assert_eq!(router.error_path, "/not-found");
//!
//! let connection = ConnectionConfig::default().probe_interval(Duration::from_secs(2));
//! assert_eq!(connection.health_path, "/api/health");
//! ```

use crate::transition::Transition;
use std::time::Duration;

/// Where the bare root path sends the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootRedirect {
    /// Target when the auth check reports a session
    pub authenticated: String,
    /// Target otherwise
    pub anonymous: String,
}

impl Default for RootRedirect {
    fn default() -> Self {
        Self {
            authenticated: "/events".to_string(),
            anonymous: "/login".to_string(),
        }
    }
}

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Path navigated to when nothing matches
    pub error_path: String,
    /// Root redirect targets
    pub root_redirect: RootRedirect,
    /// Appended to every title as `"<title> | <suffix>"`
    pub title_suffix: Option<String>,
    /// Suffix turning a view id into its container's element id
    pub view_suffix: String,
    /// Transition played when an overlay is dismissed
    pub close_transition: Transition,
    /// Query parameters naming an explicit overlay return target, by priority
    pub return_params: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            error_path: "/404".to_string(),
            root_redirect: RootRedirect::default(),
            title_suffix: None,
            view_suffix: "-view".to_string(),
            close_transition: Transition::fade(200),
            return_params: vec!["back".to_string(), "return".to_string()],
        }
    }
}

impl RouterConfig {
    /// Set the error route path.
    pub fn error_path(mut self, path: impl Into<String>) -> Self {
        self.error_path = path.into();
        self
    }

    /// Set the root redirect targets.
    pub fn root_redirect(
        mut self,
        authenticated: impl Into<String>,
        anonymous: impl Into<String>,
    ) -> Self {
        self.root_redirect = RootRedirect {
            authenticated: authenticated.into(),
            anonymous: anonymous.into(),
        };
        self
    }

    /// Append a suffix to every document title.
    pub fn title_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.title_suffix = Some(suffix.into());
        self
    }

    /// Set the overlay closing transition.
    pub fn close_transition(mut self, transition: Transition) -> Self {
        self.close_transition = transition;
        self
    }

    /// Element id of the container for `view_id`.
    pub fn element_id(&self, view_id: &str) -> String {
        format!("{}{}", view_id, self.view_suffix)
    }
}

/// Request layer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    /// Prefixed to URLs that start with `/`
    pub base_url: String,
}

impl RequestConfig {
    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Absolute URL for `url`.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with('/') && !self.base_url.is_empty() {
            format!("{}{}", self.base_url.trim_end_matches('/'), url)
        } else {
            url.to_string()
        }
    }
}

/// Connection monitor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Health endpoint, answered with 2xx when the backend is up
    pub health_path: String,
    /// Delay between probe attempts
    pub probe_interval: Duration,
    /// No probe within this long after a successful request
    pub success_cooldown: Duration,
    /// The fallback view is only shown when a navigation happened this recently
    pub recent_navigation_window: Duration,
    /// Element id of the full-screen "no connection" container
    pub fallback_element_id: String,
    /// Persistent toast shown while disconnected
    pub lost_message: String,
    /// Transient toast shown on recovery
    pub restored_message: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            health_path: "/api/health".to_string(),
            probe_interval: Duration::from_secs(1),
            success_cooldown: Duration::from_secs(10),
            recent_navigation_window: Duration::from_secs(5),
            fallback_element_id: "offline-view".to_string(),
            lost_message: "Connection lost. Retrying...".to_string(),
            restored_message: "Connection restored".to_string(),
        }
    }
}

impl ConnectionConfig {
    /// Set the health endpoint.
    pub fn health_path(mut self, path: impl Into<String>) -> Self {
        self.health_path = path.into();
        self
    }

    /// Set the probe interval.
    pub fn probe_interval(mut self, interval: Duration) -> Self {
        self.probe_interval = interval;
        self
    }

    /// Set the post-success probe cooldown.
    pub fn success_cooldown(mut self, cooldown: Duration) -> Self {
        self.success_cooldown = cooldown;
        self
    }

    /// Set the recent-navigation window for the fallback view.
    pub fn recent_navigation_window(mut self, window: Duration) -> Self {
        self.recent_navigation_window = window;
        self
    }

    /// Set the element id of the fallback container.
    pub fn fallback_element_id(mut self, element_id: impl Into<String>) -> Self {
        self.fallback_element_id = element_id.into();
        self
    }

    /// Set the toast messages for connection loss and recovery.
    pub fn messages(mut self, lost: impl Into<String>, restored: impl Into<String>) -> Self {
        self.lost_message = lost.into();
        self.restored_message = restored.into();
        self
    }
}

/// Toast configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastConfig {
    /// Auto-dismiss delay of transient toasts
    pub timeout: Duration,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_id() {
        assert_eq!(RouterConfig::default().element_id("events"), "events-view");
    }

    #[test]
    fn test_request_base_url() {
        let config = RequestConfig::default().base_url("https://club.example/");
        assert_eq!(
            config.resolve("/api/events"),
            "https://club.example/api/events"
        );
        assert_eq!(
            config.resolve("https://other.example/x"),
            "https://other.example/x"
        );
        assert_eq!(RequestConfig::default().resolve("/api/x"), "/api/x");
    }

    #[test]
    fn test_root_redirect_builder() {
        let config = RouterConfig::default().root_redirect("/home", "/welcome");
        assert_eq!(config.root_redirect.authenticated, "/home");
        assert_eq!(config.root_redirect.anonymous, "/welcome");
    }
}
