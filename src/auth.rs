//! Session check used by the root redirect.
//!
//! The router asks an [`AuthCheck`] whether the user is signed in when the
//! bare root path is navigated to. The check itself belongs to the backend;
//! [`ApiAuthCheck`] asks it over HTTP.

use crate::request::RequestClient;
use crate::trace_log;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde::Deserialize;

/// Answers "is there a signed-in session?".
pub trait AuthCheck {
    /// Resolve to `true` for an authenticated session. Failures resolve to
    /// `false`.
    fn is_authenticated(&self) -> LocalBoxFuture<'static, bool>;
}

#[derive(Debug, Deserialize)]
struct AuthStatus {
    #[serde(default)]
    authenticated: bool,
}

/// [`AuthCheck`] asking the backend's status endpoint.
///
/// Expects a JSON body of the form `{ "authenticated": true }`. Network and
/// HTTP errors, as well as unexpected bodies, count as anonymous.
#[derive(Debug, Clone)]
pub struct ApiAuthCheck {
    client: RequestClient,
    url: String,
}

impl ApiAuthCheck {
    /// Endpoint used by [`new`](Self::new).
    pub const DEFAULT_URL: &'static str = "/api/auth/status";

    /// Check against [`DEFAULT_URL`](Self::DEFAULT_URL).
    pub fn new(client: RequestClient) -> Self {
        Self::with_url(client, Self::DEFAULT_URL)
    }

    /// Check against a custom endpoint.
    pub fn with_url(client: RequestClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl AuthCheck for ApiAuthCheck {
    fn is_authenticated(&self) -> LocalBoxFuture<'static, bool> {
        // Never cached: the answer changes on login and logout
        let status = self.client.get_as::<AuthStatus>(&self.url, false);
        async move {
            match status.await {
                Ok(status) => status.authenticated,
                Err(err) => {
                    trace_log!("Auth status check failed: {}", err);
                    false
                }
            }
        }
        .boxed_local()
    }
}
