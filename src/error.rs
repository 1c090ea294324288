//! Error and outcome types.
//!
//! Two families live here:
//!
//! - Navigation outcomes. [`NavigationResult`] is what every
//!   [`Router`](crate::Router) navigation returns. Routing never fails with an
//!   `Err`: a miss is redirected to the error route, a stale navigation is
//!   reported as [`Superseded`](NavigationResult::Superseded).
//!   [`NavigationError`] carries diagnostics (e.g. from
//!   [`Router::missing_views`](crate::Router::missing_views)).
//! - Request failures. [`RequestError`] separates the three failure classes
//!   the request layer distinguishes: the network never answered, the server
//!   answered with a non-2xx status, or the body could not be parsed.
//!
//! # Examples
//!
//! ```
//! use club_navigator::error::{NavigationResult, RequestError};
//!
//! let result = NavigationResult::Success { path: "/events".into() };
//! assert!(result.is_success());
//!
//! assert_eq!(RequestError::Network.to_string(), "Network error");
//! assert_eq!(
//!     RequestError::Status { status: 404 }.to_string(),
//!     "Request failed with status: 404"
//! );
//! ```

use serde_json::Value;
use std::fmt;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// The view switch was applied and a navigation event was broadcast.
    Success { path: String },
    /// The path equals the current location and the switch was not forced.
    Unchanged { path: String },
    /// Nothing matched, not even the error route.
    NotFound { path: String },
    /// The path was redirected (root redirect or routing miss) and the
    /// redirect target was navigated to.
    Redirected { from: String, to: String },
    /// A newer navigation started while this one was waiting.
    Superseded { path: String },
}

impl NavigationResult {
    /// Check if the view switch was applied
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if the navigation was a no-op
    pub fn is_unchanged(&self) -> bool {
        matches!(self, NavigationResult::Unchanged { .. })
    }

    /// Check if no route (including the error route) matched
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if the navigation ended somewhere else than requested
    pub fn is_redirected(&self) -> bool {
        matches!(self, NavigationResult::Redirected { .. })
    }

    /// Check if a newer navigation won
    pub fn is_superseded(&self) -> bool {
        matches!(self, NavigationResult::Superseded { .. })
    }

    /// Path the router ended up at, if it moved anywhere.
    pub fn final_path(&self) -> Option<&str> {
        match self {
            NavigationResult::Success { path } | NavigationResult::Unchanged { path } => Some(path),
            NavigationResult::Redirected { to, .. } => Some(to),
            NavigationResult::NotFound { .. } | NavigationResult::Superseded { .. } => None,
        }
    }
}

/// Diagnostic errors reported by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// No registered pattern matches the path
    RouteNotFound { path: String },

    /// A route's view id has no container, or more than one
    MissingView { view_id: String, containers: usize },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::RouteNotFound { path } => {
                write!(f, "Route not found: {}", path)
            }
            NavigationError::MissingView {
                view_id,
                containers,
            } => {
                write!(
                    f,
                    "View '{}' expects exactly one container, found {}",
                    view_id, containers
                )
            }
        }
    }
}

impl std::error::Error for NavigationError {}

// ============================================================================
// Request Errors
// ============================================================================

/// Failure of a request issued through [`RequestClient`](crate::RequestClient).
///
/// `Clone` because cached GETs hand the same settled result to every caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    /// No response reached us (status 0, DNS failure, connection refused...).
    #[error("Network error")]
    Network,

    /// Non-2xx status without a structured error body.
    #[error("Request failed with status: {status}")]
    Status { status: u16 },

    /// Non-2xx status on a mutating request whose body was valid JSON.
    /// The body is kept verbatim.
    #[error("{}", server_message(body, *status))]
    Server { status: u16, body: Value },

    /// A 2xx response whose body is not valid JSON (or not the expected shape).
    #[error("Failed to parse response: {message}")]
    Parse { message: String },

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {message}")]
    Encode { message: String },

    /// The request could not be built (malformed or unresolvable URL).
    /// Nothing was sent, so this says nothing about connectivity.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl RequestError {
    /// Whether this failure means the backend is unreachable.
    pub fn is_network(&self) -> bool {
        matches!(self, RequestError::Network)
    }

    /// HTTP status attached to the failure, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status } | RequestError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured error body returned by the server, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            RequestError::Server { body, .. } => Some(body),
            _ => None,
        }
    }
}

fn server_message(body: &Value, status: u16) -> String {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map_or_else(
            || format!("Request failed with status: {}", status),
            str::to_string,
        )
}

// ============================================================================
// Tests
// ============================================================================
