//! JSON request layer.
//!
//! [`RequestClient`] wraps an [`HttpTransport`] with the behaviour every
//! feature module relies on:
//!
//! - **Cached GETs.** `get(url, true)` memoizes the in-flight future by URL,
//!   so concurrent duplicate reads share one network request and later reads
//!   replay the settled body.
//! - **Pessimistic invalidation.** `post`, `put` and `delete` clear the whole
//!   GET cache before they are sent.
//! - **No poisoned entries.** A cached GET that fails is evicted, so the
//!   next cached call retries over the network.
//! - **Normalized errors.** Failures come back as [`RequestError`]: network,
//!   HTTP status (with the server's JSON error body verbatim for mutating
//!   calls), or parse failure.
//! - **Connectivity reporting.** Every completion tells the
//!   [`ConnectivityReporter`] (the [`ConnectionMonitor`](crate::ConnectionMonitor))
//!   whether the backend answered. This never affects the returned value.
//!
//! Like browser promises, requests run to completion whether or not anyone
//! awaits them. The transport is called when the method is called, and with
//! a spawner set ([`RequestClient::with_spawner`]) the rest of the work
//! (response handling, connectivity reporting, cache eviction) runs as its
//! own task. Dropping the returned future does not cancel the request.
//! Without a spawner only the caller's polling drives that work.
//!
//! # Example
//!
//! ```no_run
//! # use club_navigator::{RequestClient, RequestError};
//! # async fn demo(client: RequestClient) -> Result<(), RequestError> {
//! use serde_json::json;
//!
//! let events = client.get("/api/events", true).await?;
//! client.post("/api/events/7/signup", &json!({ "note": "bringing snacks" })).await?;
//! // The POST cleared the cache, so this goes back to the network
//! let fresh = client.get("/api/events", true).await?;
//! # let _ = (events, fresh);
//! # Ok(())
//! # }
//! ```

use crate::config::RequestConfig;
use crate::error::RequestError;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::{debug_log, trace_log, warn_log};
use futures::future::{self, LocalBoxFuture, Shared};
use futures::task::{LocalSpawn, LocalSpawnExt};
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};

/// Future returned by every verb. Resolves to the parsed JSON body.
pub type ResponseFuture = LocalBoxFuture<'static, Result<Value, RequestError>>;

type SharedResponse = Shared<ResponseFuture>;

/// Receives the connectivity side effect of every request.
pub trait ConnectivityReporter {
    /// `true` when the backend answered, `false` when nothing came back.
    fn report(&self, connected: bool);
}

struct CacheEntry {
    /// Distinguishes this entry from a later one stored under the same URL
    id: u64,
    response: SharedResponse,
}

struct ClientInner {
    transport: Rc<dyn HttpTransport>,
    config: RequestConfig,
    cache: RefCell<HashMap<String, CacheEntry>>,
    next_entry: Cell<u64>,
    reporter: RefCell<Option<Rc<dyn ConnectivityReporter>>>,
    spawner: Option<Rc<dyn LocalSpawn>>,
}

impl ClientInner {
    /// Remove `url` from the cache if it still holds entry `id`.
    fn evict(&self, url: &str, id: u64) {
        let mut cache = self.cache.borrow_mut();
        if cache.get(url).is_some_and(|entry| entry.id == id) {
            cache.remove(url);
            debug_log!("Evicted failed cached GET '{}'", url);
        }
    }
}

/// HTTP client with a GET cache, error normalization and connectivity
/// reporting.
///
/// Cloning yields another handle to the same cache.
#[derive(Clone)]
pub struct RequestClient {
    inner: Rc<ClientInner>,
}

impl RequestClient {
    /// Create a client sending through `transport`.
    ///
    /// Requests are driven by whoever polls the returned futures; see
    /// [`with_spawner`](Self::with_spawner) for requests that complete on
    /// their own.
    pub fn new(transport: Rc<dyn HttpTransport>, config: RequestConfig) -> Self {
        Self::build(transport, config, None)
    }

    /// Client whose requests complete as tasks on `spawner`, even when the
    /// caller drops the returned future.
    pub fn with_spawner(
        transport: Rc<dyn HttpTransport>,
        config: RequestConfig,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        Self::build(transport, config, Some(spawner))
    }

    fn build(
        transport: Rc<dyn HttpTransport>,
        config: RequestConfig,
        spawner: Option<Rc<dyn LocalSpawn>>,
    ) -> Self {
        Self {
            inner: Rc::new(ClientInner {
                transport,
                config,
                cache: RefCell::new(HashMap::new()),
                next_entry: Cell::new(0),
                reporter: RefCell::new(None),
                spawner,
            }),
        }
    }

    /// Route connectivity reports to `reporter`.
    pub fn set_reporter(&self, reporter: Rc<dyn ConnectivityReporter>) {
        *self.inner.reporter.borrow_mut() = Some(reporter);
    }

    /// GET `url`, optionally through the cache.
    ///
    /// With `use_cache`, an existing entry (pending or settled) is returned
    /// unchanged; otherwise a new request is issued and stored.
    pub fn get(&self, url: &str, use_cache: bool) -> ResponseFuture {
        let request = HttpRequest::new(HttpMethod::Get, self.inner.config.resolve(url));
        if !use_cache {
            return self.start(self.execute(request)).boxed_local();
        }

        if let Some(entry) = self.inner.cache.borrow().get(url) {
            trace_log!("Request cache hit for '{}'", url);
            return entry.response.clone().boxed_local();
        }
        trace_log!("Request cache miss for '{}'", url);

        let id = self.inner.next_entry.get();
        self.inner.next_entry.set(id + 1);

        let pending = self.execute(request);
        let weak: Weak<ClientInner> = Rc::downgrade(&self.inner);
        let key = url.to_string();
        let work = async move {
            let result = pending.await;
            if result.is_err() {
                if let Some(inner) = weak.upgrade() {
                    inner.evict(&key, id);
                }
            }
            result
        }
        .boxed_local();

        // Stored before starting, so an eviction on completion finds it
        let response = work.shared();
        self.inner.cache.borrow_mut().insert(
            url.to_string(),
            CacheEntry {
                id,
                response: response.clone(),
            },
        );
        self.spawn(&response);
        response.boxed_local()
    }

    /// GET and deserialize into `T`.
    pub fn get_as<T>(
        &self,
        url: &str,
        use_cache: bool,
    ) -> impl Future<Output = Result<T, RequestError>> + 'static
    where
        T: DeserializeOwned + 'static,
    {
        let response = self.get(url, use_cache);
        async move {
            let value = response.await?;
            serde_json::from_value(value).map_err(|err| RequestError::Parse {
                message: err.to_string(),
            })
        }
    }

    /// POST a JSON body. Clears the GET cache first.
    pub fn post<B>(&self, url: &str, body: &B) -> ResponseFuture
    where
        B: Serialize + ?Sized,
    {
        self.send_with_body(HttpMethod::Post, url, body)
    }

    /// PUT a JSON body. Clears the GET cache first.
    pub fn put<B>(&self, url: &str, body: &B) -> ResponseFuture
    where
        B: Serialize + ?Sized,
    {
        self.send_with_body(HttpMethod::Put, url, body)
    }

    /// DELETE. Clears the GET cache first.
    pub fn delete(&self, url: &str) -> ResponseFuture {
        self.clear_cache(None);
        let request = HttpRequest::new(HttpMethod::Delete, self.inner.config.resolve(url));
        self.start(self.execute(request)).boxed_local()
    }

    /// Drop one cached URL, or everything with `None`.
    pub fn clear_cache(&self, url: Option<&str>) {
        let mut cache = self.inner.cache.borrow_mut();
        match url {
            Some(url) => {
                cache.remove(url);
            }
            None => {
                if !cache.is_empty() {
                    debug_log!("Clearing {} cached GET(s)", cache.len());
                }
                cache.clear();
            }
        }
    }

    /// Whether `url` has a cache entry.
    pub fn is_cached(&self, url: &str) -> bool {
        self.inner.cache.borrow().contains_key(url)
    }

    /// Number of cache entries.
    pub fn cached_len(&self) -> usize {
        self.inner.cache.borrow().len()
    }

    fn send_with_body<B>(&self, method: HttpMethod, url: &str, body: &B) -> ResponseFuture
    where
        B: Serialize + ?Sized,
    {
        self.clear_cache(None);
        match serde_json::to_string(body) {
            Ok(json) => {
                let request =
                    HttpRequest::new(method, self.inner.config.resolve(url)).json_body(json);
                self.start(self.execute(request)).boxed_local()
            }
            Err(err) => future::ready(Err(RequestError::Encode {
                message: err.to_string(),
            }))
            .boxed_local(),
        }
    }

    /// Hand `request` to the transport now and return the work that
    /// interprets and reports its outcome.
    fn execute(&self, request: HttpRequest) -> ResponseFuture {
        let method = request.method;
        trace_log!("{} {}", method, request.url);
        let reporter = self.inner.reporter.borrow().clone();
        let report = move |connected: bool| {
            if let Some(reporter) = &reporter {
                reporter.report(connected);
            }
        };
        let sending = self.inner.transport.send(request);

        async move {
            let response = match sending.await {
                Ok(response) if response.is_network_failure() => {
                    report(false);
                    return Err(RequestError::Network);
                }
                Ok(response) => response,
                Err(err) if err.is_network() => {
                    report(false);
                    return Err(RequestError::Network);
                }
                Err(err) => {
                    warn_log!("Request not sent: {}", err.message);
                    return Err(RequestError::InvalidRequest {
                        message: err.message,
                    });
                }
            };
            report(true);
            interpret(method, response)
        }
        .boxed_local()
    }

    /// Run `work` to completion independently of the returned handle.
    fn start(&self, work: ResponseFuture) -> SharedResponse {
        let response = work.shared();
        self.spawn(&response);
        response
    }

    /// Drive a clone of `response` on the spawner, if there is one.
    fn spawn(&self, response: &SharedResponse) {
        let Some(spawner) = &self.inner.spawner else {
            return;
        };
        if let Err(err) = spawner.spawn_local(response.clone().map(drop)) {
            warn_log!("Could not spawn request task, caller drives it: {}", err);
        }
    }
}

impl fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestClient")
            .field("config", &self.inner.config)
            .field("cached", &self.inner.cache.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Turn a received response into the body or a typed error.
fn interpret(method: HttpMethod, response: HttpResponse) -> Result<Value, RequestError> {
    if response.is_success() {
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(&response.body).map_err(|err| RequestError::Parse {
            message: err.to_string(),
        });
    }

    let status = response.status;
    if method.is_mutating() {
        if let Ok(body) = serde_json::from_str::<Value>(&response.body) {
            return Err(RequestError::Server { status, body });
        }
    }
    Err(RequestError::Status { status })
}
