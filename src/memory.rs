//! In-memory implementations of the platform seams.
//!
//! These back the crate's own tests and are public so applications can test
//! their feature modules against a router without a browser:
//!
//! - [`MemoryDocument`]: view containers, location, session history, title.
//! - [`MemoryToasts`]: records shown and dismissed toasts.
//! - [`ManualClock`]: time only moves when told to.
//! - [`ScriptedTransport`]: canned HTTP responses, with call recording and
//!   a pause switch for holding responses in flight.
//! - [`ManualAuth`]: session check answered by the test.

use crate::auth::AuthCheck;
use crate::host::{BrowserLocation, Clock, ViewHost};
use crate::toast::{Toast, ToastHost, ToastId};
use crate::transition::Transition;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;
use web_time::Instant;

// ============================================================================
// MemoryDocument
// ============================================================================

#[derive(Debug, Clone)]
struct MemoryView {
    id: String,
    hidden: bool,
}

/// A page with view containers and a session history.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    views: RefCell<Vec<MemoryView>>,
    location: RefCell<String>,
    /// Entries behind the current one
    session: RefCell<Vec<String>>,
    title: RefCell<String>,
    pushes: RefCell<Vec<String>>,
    backs: Cell<usize>,
    transitions: RefCell<Vec<(String, Transition)>>,
}

impl MemoryDocument {
    /// Empty page loaded at `location`.
    pub fn new(location: &str) -> Self {
        Self {
            location: RefCell::new(location.to_string()),
            ..Self::default()
        }
    }

    /// Append a visible view container.
    pub fn add_view(&self, element_id: &str) {
        self.views.borrow_mut().push(MemoryView {
            id: element_id.to_string(),
            hidden: false,
        });
    }

    /// Ids of the containers not hidden, in document order.
    pub fn visible_views(&self) -> Vec<String> {
        self.views
            .borrow()
            .iter()
            .filter(|view| !view.hidden)
            .map(|view| view.id.clone())
            .collect()
    }

    /// Move the location without a history entry, like typing in the
    /// address bar before a `popstate`.
    pub fn set_location(&self, location: &str) {
        *self.location.borrow_mut() = location.to_string();
    }

    /// Current document title.
    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    /// Every path passed to `push_state`, in order.
    pub fn pushes(&self) -> Vec<String> {
        self.pushes.borrow().clone()
    }

    /// Number of native back navigations.
    pub fn back_count(&self) -> usize {
        self.backs.get()
    }

    /// Transitions played, with the element they ran on.
    pub fn transitions(&self) -> Vec<(String, Transition)> {
        self.transitions.borrow().clone()
    }
}

impl ViewHost for MemoryDocument {
    fn view_ids(&self) -> Vec<String> {
        self.views.borrow().iter().map(|view| view.id.clone()).collect()
    }

    fn set_hidden(&self, element_id: &str, hidden: bool) -> bool {
        let mut found = false;
        for view in self.views.borrow_mut().iter_mut().filter(|view| view.id == element_id) {
            view.hidden = hidden;
            found = true;
        }
        found
    }

    fn is_hidden(&self, element_id: &str) -> Option<bool> {
        self.views
            .borrow()
            .iter()
            .find(|view| view.id == element_id)
            .map(|view| view.hidden)
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn play_transition(
        &self,
        element_id: &str,
        transition: Transition,
    ) -> LocalBoxFuture<'static, ()> {
        self.transitions
            .borrow_mut()
            .push((element_id.to_string(), transition));
        future::ready(()).boxed_local()
    }
}

impl BrowserLocation for MemoryDocument {
    fn current(&self) -> String {
        self.location.borrow().clone()
    }

    fn push_state(&self, path: &str) {
        let previous = std::mem::replace(&mut *self.location.borrow_mut(), path.to_string());
        self.session.borrow_mut().push(previous);
        self.pushes.borrow_mut().push(path.to_string());
    }

    fn back(&self) {
        self.backs.set(self.backs.get() + 1);
        if let Some(previous) = self.session.borrow_mut().pop() {
            *self.location.borrow_mut() = previous;
        }
    }
}

// ============================================================================
// MemoryToasts
// ============================================================================

/// Records toasts instead of rendering them. Nothing expires on its own.
#[derive(Debug, Default)]
pub struct MemoryToasts {
    shown: RefCell<Vec<Toast>>,
    dismissed: RefCell<Vec<ToastId>>,
}

impl MemoryToasts {
    /// No toasts yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every toast ever shown.
    pub fn shown(&self) -> Vec<Toast> {
        self.shown.borrow().clone()
    }

    /// Shown and not dismissed.
    pub fn visible(&self) -> Vec<Toast> {
        let dismissed = self.dismissed.borrow();
        self.shown
            .borrow()
            .iter()
            .filter(|toast| !dismissed.contains(&toast.id))
            .cloned()
            .collect()
    }

    /// How many toasts with `message` were shown.
    pub fn count_message(&self, message: &str) -> usize {
        self.shown
            .borrow()
            .iter()
            .filter(|toast| toast.message == message)
            .count()
    }
}

impl ToastHost for MemoryToasts {
    fn show(&self, toast: &Toast) {
        self.shown.borrow_mut().push(toast.clone());
    }

    fn dismiss(&self, id: ToastId) {
        self.dismissed.borrow_mut().push(id);
    }
}

// ============================================================================
// ManualClock
// ============================================================================

/// [`Clock`] that only advances through [`advance`](Self::advance).
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    elapsed: Cell<Duration>,
}

impl ManualClock {
    /// Clock frozen at the moment of creation.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed.get()
    }
}

// ============================================================================
// ScriptedTransport
// ============================================================================

type Reply = Result<HttpResponse, TransportError>;

/// [`HttpTransport`] answering from a script.
///
/// Each request takes, in order of preference: the reply registered for its
/// URL with [`respond_to`](Self::respond_to), the next queued reply, or the
/// default (`200` with `{}` unless changed).
#[derive(Debug)]
pub struct ScriptedTransport {
    by_url: RefCell<Vec<(String, Reply)>>,
    queue: RefCell<VecDeque<Reply>>,
    default: RefCell<Reply>,
    calls: RefCell<Vec<HttpRequest>>,
    paused: Cell<bool>,
    held: RefCell<Vec<oneshot::Sender<()>>>,
}

impl ScriptedTransport {
    /// Transport answering `200 {}` to everything.
    pub fn new() -> Self {
        Self {
            by_url: RefCell::new(Vec::new()),
            queue: RefCell::new(VecDeque::new()),
            default: RefCell::new(Ok(HttpResponse::new(200, "{}"))),
            calls: RefCell::new(Vec::new()),
            paused: Cell::new(false),
            held: RefCell::new(Vec::new()),
        }
    }

    /// Queue a response.
    pub fn push_response(&self, status: u16, body: &str) {
        self.queue
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: u16, body: &serde_json::Value) {
        self.push_response(status, &body.to_string());
    }

    /// Queue a failure with no response.
    pub fn push_network_error(&self) {
        self.queue
            .borrow_mut()
            .push_back(Err(TransportError::network("connection refused")));
    }

    /// Queue a request that fails before anything is sent.
    pub fn push_invalid_request(&self, message: &str) {
        self.queue
            .borrow_mut()
            .push_back(Err(TransportError::invalid_request(message)));
    }

    /// Always answer `url` with this response.
    pub fn respond_to(&self, url: &str, status: u16, body: &str) {
        let mut by_url = self.by_url.borrow_mut();
        by_url.retain(|(known, _)| known != url);
        by_url.push((url.to_string(), Ok(HttpResponse::new(status, body))));
    }

    /// Change the reply used when nothing else applies.
    pub fn set_default_response(&self, status: u16, body: &str) {
        *self.default.borrow_mut() = Ok(HttpResponse::new(status, body));
    }

    /// Make every unscripted request fail (`true`) or succeed again.
    pub fn set_offline(&self, offline: bool) {
        *self.default.borrow_mut() = if offline {
            Err(TransportError::network("offline"))
        } else {
            Ok(HttpResponse::new(200, "{}"))
        };
    }

    /// Hold every response sent from now on until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.paused.set(true);
    }

    /// Release held responses and stop holding new ones.
    pub fn resume(&self) {
        self.paused.set(false);
        for gate in self.held.borrow_mut().drain(..) {
            let _ = gate.send(());
        }
    }

    /// Number of requests sent.
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Number of requests sent to `url`.
    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|request| request.url == url)
            .count()
    }

    /// Every request sent, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.calls.borrow().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.calls.borrow().last().cloned()
    }

    fn reply_for(&self, url: &str) -> Reply {
        let by_url = self.by_url.borrow();
        if let Some((_, reply)) = by_url.iter().find(|(known, _)| known == url) {
            return reply.clone();
        }
        drop(by_url);
        if let Some(reply) = self.queue.borrow_mut().pop_front() {
            return reply;
        }
        self.default.borrow().clone()
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for ScriptedTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>> {
        let reply = self.reply_for(&request.url);
        self.calls.borrow_mut().push(request);

        if self.paused.get() {
            let (gate, released) = oneshot::channel();
            self.held.borrow_mut().push(gate);
            return async move {
                let _ = released.await;
                reply
            }
            .boxed_local();
        }
        future::ready(reply).boxed_local()
    }
}

// ============================================================================
// ManualAuth
// ============================================================================

/// [`AuthCheck`] answered by the test.
///
/// [`fixed`](Self::fixed) answers immediately; [`new`](Self::new) keeps
/// every check pending until [`resolve`](Self::resolve).
#[derive(Debug, Default)]
pub struct ManualAuth {
    fixed: Option<bool>,
    pending: RefCell<Vec<oneshot::Sender<bool>>>,
}

impl ManualAuth {
    /// Checks stay pending until resolved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks answer `authenticated` at once.
    pub fn fixed(authenticated: bool) -> Self {
        Self {
            fixed: Some(authenticated),
            pending: RefCell::new(Vec::new()),
        }
    }

    /// Answer every pending check.
    pub fn resolve(&self, authenticated: bool) {
        for pending in self.pending.borrow_mut().drain(..) {
            let _ = pending.send(authenticated);
        }
    }
}

impl AuthCheck for ManualAuth {
    fn is_authenticated(&self) -> LocalBoxFuture<'static, bool> {
        if let Some(authenticated) = self.fixed {
            return future::ready(authenticated).boxed_local();
        }
        let (answer, answered) = oneshot::channel();
        self.pending.borrow_mut().push(answer);
        async move { answered.await.unwrap_or(false) }.boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpMethod;

    #[test]
    fn test_document_session_history() {
        let document = MemoryDocument::new("/");
        document.push_state("/events");
        document.push_state("/event/1");
        document.back();

        assert_eq!(document.current(), "/events");
        assert_eq!(document.pushes(), vec!["/events", "/event/1"]);
        assert_eq!(document.back_count(), 1);
    }

    #[test]
    fn test_document_views() {
        let document = MemoryDocument::new("/");
        document.add_view("a-view");
        document.add_view("b-view");

        assert!(document.set_hidden("a-view", true));
        assert!(!document.set_hidden("c-view", true));
        assert_eq!(document.visible_views(), vec!["b-view"]);
        assert_eq!(document.is_hidden("c-view"), None);
    }

    #[test]
    fn test_script_order() {
        let transport = ScriptedTransport::new();
        transport.respond_to("/api/health", 200, "");
        transport.push_response(500, "");

        let get = |url: &str| {
            pollster::block_on(transport.send(HttpRequest::new(HttpMethod::Get, url)))
        };
        let health = get("/api/health");
        let queued = get("/x");
        let fallback = get("/x");

        assert_eq!(health.unwrap().status, 200);
        assert_eq!(queued.unwrap().status, 500);
        assert_eq!(fallback.unwrap().body, "{}");
        assert_eq!(transport.calls_to("/x"), 2);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new();
        let before = clock.now();
        clock.advance(Duration::from_secs(3));
        assert_eq!(clock.now() - before, Duration::from_secs(3));
    }
}
