//! Shared fixtures for the integration tests.
//!
//! Builds a fully wired application on the in-memory platform, with the
//! club's route table and one container per view.

#![allow(dead_code)]

use club_navigator::host::ViewHost;
use club_navigator::memory::{ManualClock, MemoryDocument, MemoryToasts, ScriptedTransport};
use club_navigator::*;
use futures::executor::LocalPool;
use std::cell::RefCell;
use std::rc::Rc;

/// Element ids of every view container in the test page.
pub const VIEWS: &[&str] = &[
    "login-view",
    "events-view",
    "event-view",
    "profile-view",
    "admin-view",
    "404-view",
    "offline-view",
];

/// A wired application plus handles on its in-memory platform.
pub struct Harness {
    pub app: AppContext,
    pub document: Rc<MemoryDocument>,
    pub toasts: Rc<MemoryToasts>,
    pub transport: Rc<ScriptedTransport>,
    pub clock: Rc<ManualClock>,
    /// Executor the application's request tasks are spawned on
    pub pool: RefCell<LocalPool>,
}

impl Harness {
    pub fn router(&self) -> &Router {
        &self.app.router
    }

    pub fn requests(&self) -> &RequestClient {
        &self.app.requests
    }

    /// Run spawned request tasks until none can make progress.
    pub fn run_tasks(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }
}

/// Register the club's routes.
pub fn club_routes(router: &Router) {
    router.add_route("/login", "login", RouteOptions::new());
    router.add_route("/events", "events", RouteOptions::new());
    router.add_route(
        "/event/:id",
        "event",
        RouteOptions::new().overlay().title(|_| "Event".to_string()),
    );
    router.add_route("/profile", "profile", RouteOptions::new());
    router.add_route("/admin/*", "admin", RouteOptions::new());
    router.add_route("/404", "404", RouteOptions::new());
}

/// Page with every container from [`VIEWS`], loaded at `location`.
pub fn document(location: &str) -> Rc<MemoryDocument> {
    let document = Rc::new(MemoryDocument::new(location));
    for view in VIEWS {
        document.add_view(view);
    }
    document
}

/// Route crate logs to the test output. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Application loaded at `location`, not started yet.
pub fn harness(location: &str) -> Harness {
    init_logging();
    let document = document(location);
    let toasts = Rc::new(MemoryToasts::new());
    let transport = Rc::new(ScriptedTransport::new());
    let clock = Rc::new(ManualClock::new());
    let pool = LocalPool::new();

    let platform = Platform {
        views: document.clone(),
        location: document.clone(),
        toasts: toasts.clone(),
        transport: transport.clone(),
        clock: clock.clone(),
        spawner: Rc::new(pool.spawner()),
    };
    let app = init_app(platform, AppConfig::default(), club_routes);

    Harness {
        app,
        document,
        toasts,
        transport,
        clock,
        pool: RefCell::new(pool),
    }
}

/// Bare router over a fresh page, without the rest of the application.
pub fn router(location: &str) -> (Router, Rc<MemoryDocument>) {
    init_logging();
    let document = document(location);
    let router = Router::new(RouterConfig::default(), document.clone(), document.clone());
    (router, document)
}

/// Collect every navigation event broadcast by `router`.
pub fn record_events(router: &Router) -> Rc<RefCell<Vec<NavigationEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    router.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

/// Element ids that are currently hidden.
pub fn hidden_views(document: &MemoryDocument) -> Vec<String> {
    VIEWS
        .iter()
        .filter(|id| document.is_hidden(id) == Some(true))
        .map(|id| id.to_string())
        .collect()
}
