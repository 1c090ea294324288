//! HTTP transport seam.
//!
//! The request layer and the connection monitor only need "send this, give
//! me status and body". [`HttpTransport`] is that contract; the `http`
//! feature provides [`ReqwestTransport`], which works both natively and on
//! `wasm32` (where reqwest drives `fetch`).
//!
//! A response with status `0` is how browsers report "no response at all";
//! callers treat it the same as a network [`TransportError`]. A request that
//! could not even be built is a different kind of failure
//! ([`TransportErrorKind::InvalidRequest`]) and does not count as lost
//! connectivity.

use futures::future::LocalBoxFuture;
use std::fmt;

/// HTTP verbs used by the request layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Upper-case verb.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the verb changes server state.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Verb
    pub method: HttpMethod,
    /// Absolute or origin-relative URL
    pub url: String,
    /// Header name/value pairs
    pub headers: Vec<(String, String)>,
    /// Serialized body
    pub body: Option<String>,
}

impl HttpRequest {
    /// Request without headers or body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attach a JSON body and its content type.
    pub fn json_body(mut self, body: String) -> Self {
        self.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        self.body = Some(body);
        self
    }

    /// Value of a header, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code; `0` means no response reached the client
    pub status: u16,
    /// Raw body text
    pub body: String,
}

impl HttpResponse {
    /// Response with the given status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Status 0, the browser's way of saying the network failed.
    pub fn is_network_failure(&self) -> bool {
        self.status == 0
    }
}

/// Why a [`TransportError`] happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The request went out (or tried to) and nothing came back.
    Network,
    /// The request could not be built, so nothing was sent.
    InvalidRequest,
}

/// Failure below HTTP: nothing was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    /// Failure class
    pub kind: TransportErrorKind,
    /// What the underlying client reported
    pub message: String,
}

impl TransportError {
    /// The backend could not be reached.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Network,
            message: message.into(),
        }
    }

    /// The request was rejected before anything was sent.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    /// Whether this failure says anything about connectivity.
    pub fn is_network(&self) -> bool {
        self.kind == TransportErrorKind::Network
    }
}

/// Sends HTTP requests.
pub trait HttpTransport {
    /// Send `request`. Non-2xx statuses are `Ok` responses.
    fn send(
        &self,
        request: HttpRequest,
    ) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>>;
}

/// [`HttpTransport`] backed by `reqwest`.
///
/// reqwest only accepts absolute URLs, on `wasm32` as well. Origin-relative
/// URLs such as `/api/health` are resolved against the configured origin;
/// without one they fail as [`TransportErrorKind::InvalidRequest`].
#[cfg(feature = "http")]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    origin: Option<String>,
}

#[cfg(feature = "http")]
impl ReqwestTransport {
    /// Transport with a default client and no origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport reusing an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            origin: None,
        }
    }

    /// Resolve origin-relative URLs against `origin` (`https://club.example`).
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        self.origin = Some(origin.trim_end_matches('/').to_string());
        self
    }

    /// Transport for the page it runs in, resolving against
    /// `window.location.origin`. `None` outside a browser window.
    #[cfg(feature = "web")]
    pub fn for_page() -> Option<Self> {
        let origin = web_sys::window()?.location().origin().ok()?;
        Some(Self::new().with_origin(origin))
    }

    /// Configured origin, if any.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Absolute form of `url`.
    fn absolute_url(&self, url: &str) -> Result<String, TransportError> {
        if url.contains("://") {
            return Ok(url.to_string());
        }
        match &self.origin {
            Some(origin) if url.starts_with('/') => Ok(format!("{}{}", origin, url)),
            Some(origin) => Ok(format!("{}/{}", origin, url)),
            None => Err(TransportError::invalid_request(format!(
                "relative URL '{}' with no origin configured",
                url
            ))),
        }
    }
}

#[cfg(feature = "http")]
impl HttpTransport for ReqwestTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>> {
        use futures::future;
        use futures::FutureExt;

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let url = match self.absolute_url(&request.url) {
            Ok(url) => url,
            Err(err) => return future::ready(Err(err)).boxed_local(),
        };
        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        async move {
            let response = builder.send().await.map_err(classify)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(classify)?;
            Ok(HttpResponse { status, body })
        }
        .boxed_local()
    }
}

/// Builder failures never left the client; everything else is the network.
#[cfg(feature = "http")]
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::invalid_request(err.to_string())
    } else {
        TransportError::network(err.to_string())
    }
}
