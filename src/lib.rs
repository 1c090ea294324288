//! # Club Navigator
//!
//! Client core of the club management single-page front end:
//!
//! - **Router / view engine** - pattern routes (`:param`, `*`), base and
//!   overlay views, browser history sync, navigation events, document titles
//! - **Request layer** - JSON over HTTP with a coalescing GET cache,
//!   invalidation on every mutation, and typed errors
//! - **Connection monitor** - edge-triggered connectivity state with toasts,
//!   a fallback view and reload on recovery
//! - **Event bus** - synchronous pub/sub with panic isolation
//! - **Toasts** - transient and persistent notifications
//!
//! The engine talks to the page only through the traits in [`host`],
//! [`toast`] and [`transport`]. The `web` feature implements them over
//! `web-sys`; [`memory`] implements them in memory for tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use club_navigator::transport::ReqwestTransport;
//! use club_navigator::{init_app, AppConfig, Platform, Route, RouteOptions};
//! use std::rc::Rc;
//!
//! let transport = ReqwestTransport::for_page().unwrap();
//! let platform = Platform::browser(Rc::new(transport)).unwrap();
//! let app = init_app(platform, AppConfig::default(), |router| {
//!     router.add_route("/login", "login", RouteOptions::new());
//!     router.add_route("/events", "events", RouteOptions::new());
//!     router.add(Route::new("/event/:id", "event").overlay());
//!     router.add_route("/admin/*", "admin", RouteOptions::new());
//!     router.add_route("/404", "404", RouteOptions::new());
//! });
//!
//! let _listeners = app.install_browser_handlers()?;
//! wasm_bindgen_futures::spawn_local(async move {
//!     app.start().await;
//! });
//! ```
//!
//! # Reacting to navigation
//!
//! ```
//! use club_navigator::memory::MemoryDocument;
//! use club_navigator::{Router, RouterConfig, RouteOptions};
//! use std::rc::Rc;
//!
//! let document = Rc::new(MemoryDocument::new("/"));
//! document.add_view("profile-view");
//! let router = Router::new(RouterConfig::default(), document.clone(), document.clone());
//! router.add_route("/profile", "profile", RouteOptions::new());
//!
//! router.subscribe(|event| {
//!     if event.view_id == "profile" {
//!         // refresh the profile panel
//!     }
//! });
//! router.navigate("/profile", false);
//! ```

#![doc(html_root_url = "https://docs.rs/club-navigator/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Ambient
pub mod config;
pub mod error;

// Primitives
pub mod event_bus;
pub mod history;
pub mod transition;

// Route matching and resolution
#[cfg(feature = "cache")]
pub mod cache;
pub mod matching;
pub mod params;
pub mod resolve;
pub mod route;
pub mod state;

// Platform seams
pub mod host;
pub mod memory;
pub mod toast;
pub mod transport;
#[cfg(feature = "web")]
pub mod web;

// Engine
pub mod auth;
pub mod connection;
pub mod request;
pub mod router;

// Wiring
mod context;

// Re-export main types for convenient access
pub use auth::{ApiAuthCheck, AuthCheck};
#[cfg(feature = "cache")]
pub use cache::{CacheStats, ResolutionCache};
pub use config::{ConnectionConfig, RequestConfig, RootRedirect, RouterConfig, ToastConfig};
pub use connection::{ConnectionMonitor, ConnectionStatus};
pub use context::{init_app, AppConfig, AppContext, Platform};
pub use error::{NavigationError, NavigationResult, RequestError};
pub use event_bus::{EventBus, Subscriber, Subscription};
pub use history::HistoryStack;
pub use matching::CompiledPattern;
pub use params::{QueryParams, RouteParams};
pub use request::{ConnectivityReporter, RequestClient, ResponseFuture};
pub use resolve::{RouteMatch, VisibilityPlan};
pub use route::{Route, RouteOptions, TitleFn};
pub use router::{CloseOutcome, NavigationEvent, Router, WeakRouter};
pub use state::RouterState;
pub use toast::{Notifier, Toast, ToastHost, ToastId, ToastKind};
pub use transition::{SlideDirection, Transition};
#[cfg(feature = "http")]
pub use transport::ReqwestTransport;
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError, TransportErrorKind,
};
