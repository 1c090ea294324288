//! Application wiring.
//!
//! The router, request layer, connection monitor and notifier are explicit
//! instances, created once at start-up and passed to the feature modules
//! that need them. [`init_app`] builds and connects them:
//!
//! - the request layer reports connectivity to the monitor;
//! - the monitor watches navigations (for its fallback-view window) and
//!   reloads the current view on recovery;
//! - the root redirect asks the backend's auth status endpoint through the
//!   request layer;
//! - requests run as tasks on the platform's spawner, so they complete even
//!   when the caller stops waiting.
//!
//! # Example
//!
//! ```
//! use club_navigator::memory::{ManualClock, MemoryDocument, MemoryToasts, ScriptedTransport};
//! use club_navigator::{init_app, AppConfig, Platform, RouteOptions};
//! use futures::executor::LocalPool;
//! use std::rc::Rc;
//!
//! let pool = LocalPool::new();
//!
//! let document = Rc::new(MemoryDocument::new("/events"));
//! document.add_view("events-view");
//!
//! let platform = Platform {
//!     views: document.clone(),
//!     location: document.clone(),
//!     toasts: Rc::new(MemoryToasts::new()),
//!     transport: Rc::new(ScriptedTransport::new()),
//!     clock: Rc::new(ManualClock::new()),
//!     spawner: Rc::new(pool.spawner()),
//! };
//! let app = init_app(platform, AppConfig::default(), |router| {
//!     router.add_route("/events", "events", RouteOptions::new());
//! });
//!
//! let result = pollster::block_on(app.start());
//! assert!(result.is_success());
//! ```

use crate::auth::ApiAuthCheck;
use crate::config::{ConnectionConfig, RequestConfig, RouterConfig, ToastConfig};
use crate::connection::ConnectionMonitor;
use crate::error::NavigationResult;
use crate::host::{BrowserLocation, Clock, ViewHost};
use crate::request::RequestClient;
use crate::router::Router;
use crate::toast::{Notifier, ToastHost};
use crate::transport::HttpTransport;
use crate::{info_log, warn_log};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawn;
use std::rc::Rc;

/// Configuration of every component.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Router settings
    pub router: RouterConfig,
    /// Request layer settings
    pub request: RequestConfig,
    /// Connection monitor settings
    pub connection: ConnectionConfig,
    /// Toast settings
    pub toast: ToastConfig,
}

/// The page-facing implementations the components run on.
#[derive(Clone)]
pub struct Platform {
    /// View containers and document title
    pub views: Rc<dyn ViewHost>,
    /// Location and session history
    pub location: Rc<dyn BrowserLocation>,
    /// Toast rendering
    pub toasts: Rc<dyn ToastHost>,
    /// HTTP
    pub transport: Rc<dyn HttpTransport>,
    /// Time source for the connection monitor
    pub clock: Rc<dyn Clock>,
    /// Runs request tasks to completion
    pub spawner: Rc<dyn LocalSpawn>,
}

#[cfg(feature = "web")]
impl Platform {
    /// The live page, sending requests through `transport`. `None` outside
    /// a browser.
    ///
    /// With the `http` feature, pass
    /// [`ReqwestTransport::for_page`](crate::ReqwestTransport::for_page) so
    /// origin-relative URLs resolve against the page's origin.
    pub fn browser(transport: Rc<dyn HttpTransport>) -> Option<Self> {
        let document = Rc::new(crate::web::WebDocument::new()?);
        Some(Self {
            views: document.clone(),
            location: document.clone(),
            toasts: document,
            transport,
            clock: Rc::new(crate::host::SystemClock),
            spawner: Rc::new(crate::web::BrowserSpawner),
        })
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}

/// The connected components of a running application.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// View router
    pub router: Router,
    /// HTTP client with the GET cache
    pub requests: RequestClient,
    /// Connectivity tracking
    pub connection: ConnectionMonitor,
    /// Toasts
    pub notifier: Notifier,
}

impl AppContext {
    /// Show the view for the current location (root redirect included).
    ///
    /// Routes without exactly one view container are logged first.
    pub fn start(&self) -> LocalBoxFuture<'static, NavigationResult> {
        for problem in self.router.missing_views() {
            warn_log!("{}", problem);
        }
        self.router.sync_with_location()
    }

    /// Register the click delegation and popstate handlers on the live page.
    ///
    /// The returned listeners unregister when dropped.
    #[cfg(feature = "web")]
    pub fn install_browser_handlers(
        &self,
    ) -> Result<Vec<crate::web::EventListener>, wasm_bindgen::JsValue> {
        use wasm_bindgen::JsValue;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(vec![
            crate::web::install_link_delegation(&self.router, &document)?,
            crate::web::install_popstate(&self.router, &window)?,
        ])
    }
}

/// Build and connect the application's components.
///
/// `configure` registers the routes.
pub fn init_app<F>(platform: Platform, config: AppConfig, configure: F) -> AppContext
where
    F: FnOnce(&Router),
{
    let notifier = Notifier::new(platform.toasts, config.toast);
    let requests = RequestClient::with_spawner(
        platform.transport.clone(),
        config.request.clone(),
        platform.spawner,
    );

    let mut connection_config = config.connection;
    connection_config.health_path = config.request.resolve(&connection_config.health_path);
    let connection = ConnectionMonitor::new(
        connection_config,
        platform.transport,
        platform.views.clone(),
        notifier.clone(),
        platform.clock,
    );
    requests.set_reporter(Rc::new(connection.clone()));

    let router = Router::new(config.router, platform.views, platform.location);
    router.set_auth_check(Rc::new(ApiAuthCheck::new(requests.clone())));
    configure(&router);

    let _ = connection.watch_navigation(&router);
    let weak = router.downgrade();
    connection.on_restored(move || {
        if let Some(router) = weak.upgrade() {
            router.reload();
        }
    });

    info_log!("Application ready with {} route(s)", router.routes().len());
    AppContext {
        router,
        requests,
        connection,
        notifier,
    }
}
