//! Connectivity tracking.
//!
//! [`ConnectionMonitor`] is a two-state machine, `Connected ⇄ Disconnected`,
//! starting optimistic. It is fed by the request layer (every completed
//! request reports whether the backend answered) and by a periodic health
//! probe.
//!
//! Transitions are edge-triggered:
//!
//! - **Connected → Disconnected** shows one persistent toast and, when the
//!   user navigated recently, reveals the full-screen fallback container.
//! - **Disconnected → Connected** dismisses that toast, shows a transient
//!   "restored" toast, hides the fallback and runs the `on_restored` hook
//!   (the router's forced reload).
//!
//! Repeated reports of the current status do nothing, except that a success
//! while a stale fallback is still visible hides it.

use crate::config::ConnectionConfig;
use crate::event_bus::{EventBus, Subscription};
use crate::host::{Clock, ViewHost};
use crate::request::ConnectivityReporter;
use crate::router::Router;
use crate::toast::{Notifier, ToastId, ToastKind};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};
use crate::{debug_log, info_log, trace_log, warn_log};
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};
use std::time::Duration;
use web_time::Instant;

/// Connectivity as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    /// The backend answered the latest request
    Connected,
    /// The latest request got no response
    Disconnected,
}

impl ConnectionStatus {
    /// Check if connected
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

#[derive(Debug)]
struct ConnectionState {
    connected: bool,
    last_success: Option<Instant>,
    /// The one "connection lost" toast, while it is up
    disconnect_toast: Option<ToastId>,
    fallback_visible: bool,
    last_navigation: Option<Instant>,
}

struct MonitorInner {
    config: ConnectionConfig,
    state: RefCell<ConnectionState>,
    notifier: Notifier,
    views: Rc<dyn ViewHost>,
    clock: Rc<dyn Clock>,
    transport: Rc<dyn HttpTransport>,
    on_restored: RefCell<Option<Rc<dyn Fn()>>>,
    changes: EventBus<ConnectionStatus>,
    running: Cell<bool>,
}

/// Tracks backend reachability and raises the user-visible feedback for it.
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct ConnectionMonitor {
    inner: Rc<MonitorInner>,
}

impl ConnectionMonitor {
    /// Create a monitor in the `Connected` state.
    pub fn new(
        config: ConnectionConfig,
        transport: Rc<dyn HttpTransport>,
        views: Rc<dyn ViewHost>,
        notifier: Notifier,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Rc::new(MonitorInner {
                config,
                state: RefCell::new(ConnectionState {
                    connected: true,
                    last_success: None,
                    disconnect_toast: None,
                    fallback_visible: false,
                    last_navigation: None,
                }),
                notifier,
                views,
                clock,
                transport,
                on_restored: RefCell::new(None),
                changes: EventBus::new(),
                running: Cell::new(false),
            }),
        }
    }

    /// Current status.
    pub fn status(&self) -> ConnectionStatus {
        if self.inner.state.borrow().connected {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }

    /// Check if the fallback container is currently shown
    pub fn is_fallback_visible(&self) -> bool {
        self.inner.state.borrow().fallback_visible
    }

    /// Run `hook` after every recovery.
    pub fn on_restored<F>(&self, hook: F)
    where
        F: Fn() + 'static,
    {
        *self.inner.on_restored.borrow_mut() = Some(Rc::new(hook));
    }

    /// Be told about every status change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ConnectionStatus) + 'static,
    {
        self.inner.changes.subscribe_fn(callback)
    }

    /// Note that a navigation happened now.
    pub fn record_navigation(&self) {
        let now = self.inner.clock.now();
        self.inner.state.borrow_mut().last_navigation = Some(now);
    }

    /// Record navigation times from `router`'s navigation events.
    pub fn watch_navigation(&self, router: &Router) -> Subscription {
        let weak: Weak<MonitorInner> = Rc::downgrade(&self.inner);
        router.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                ConnectionMonitor { inner }.record_navigation();
            }
        })
    }

    /// Feed one request outcome into the state machine.
    pub fn report(&self, connected: bool) {
        let now = self.inner.clock.now();
        if connected {
            self.mark_connected(now);
        } else {
            self.mark_disconnected(now);
        }
    }

    /// Run one health check, unless a request succeeded within the cooldown.
    ///
    /// Resolves to the status after the check, or `None` when it was skipped.
    pub fn probe(&self) -> LocalBoxFuture<'static, Option<ConnectionStatus>> {
        let now = self.inner.clock.now();
        {
            let state = self.inner.state.borrow();
            let recent_success = state.last_success.is_some_and(|at| {
                now.saturating_duration_since(at) < self.inner.config.success_cooldown
            });
            if state.connected && recent_success {
                trace_log!("Skipping health probe, last success is recent");
                return future::ready(None).boxed_local();
            }
        }

        let sending = self.inner.transport.send(HttpRequest::new(
            HttpMethod::Get,
            self.inner.config.health_path.clone(),
        ));
        let monitor = self.clone();
        async move {
            let healthy = match sending.await {
                Ok(response) => response.is_success(),
                Err(err) if err.is_network() => false,
                Err(err) => {
                    warn_log!("Health probe could not be sent: {}", err);
                    return None;
                }
            };
            monitor.report(healthy);
            Some(monitor.status())
        }
        .boxed_local()
    }

    /// Probe every `probe_interval` until [`stop`](Self::stop) is called.
    ///
    /// `sleep` supplies the timer (`gloo`/`setTimeout` in the browser, the
    /// runtime's sleep elsewhere).
    pub async fn run<S, F>(&self, sleep: S)
    where
        S: Fn(Duration) -> F,
        F: Future<Output = ()>,
    {
        self.inner.running.set(true);
        debug_log!("Connection monitor started");
        while self.inner.running.get() {
            self.probe().await;
            if !self.inner.running.get() {
                break;
            }
            sleep(self.inner.config.probe_interval).await;
        }
        debug_log!("Connection monitor stopped");
    }

    /// End the [`run`](Self::run) loop after its current step.
    pub fn stop(&self) {
        self.inner.running.set(false);
    }

    /// Check if the probe loop is running
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    fn mark_connected(&self, now: Instant) {
        let (was_connected, toast, hide_fallback) = {
            let mut state = self.inner.state.borrow_mut();
            state.last_success = Some(now);
            if state.connected && !state.fallback_visible {
                return;
            }
            let was_connected = state.connected;
            state.connected = true;
            (
                was_connected,
                state.disconnect_toast.take(),
                std::mem::take(&mut state.fallback_visible),
            )
        };

        if hide_fallback {
            self.inner
                .views
                .set_hidden(&self.inner.config.fallback_element_id, true);
        }
        if was_connected {
            debug_log!("Cleared stale connection fallback");
            return;
        }

        info_log!("Connection restored");
        if let Some(id) = toast {
            self.inner.notifier.dismiss(id);
        }
        self.inner
            .notifier
            .success(self.inner.config.restored_message.clone());
        self.inner.changes.notify(&ConnectionStatus::Connected);

        let hook = self.inner.on_restored.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    fn mark_disconnected(&self, now: Instant) {
        let show_fallback = {
            let mut state = self.inner.state.borrow_mut();
            if !state.connected {
                return;
            }
            state.connected = false;
            state.last_navigation.is_some_and(|at| {
                now.saturating_duration_since(at) <= self.inner.config.recent_navigation_window
            })
        };

        warn_log!("Connection lost");
        let toast = self
            .inner
            .notifier
            .persistent(ToastKind::Error, self.inner.config.lost_message.clone());
        if show_fallback {
            self.inner
                .views
                .set_hidden(&self.inner.config.fallback_element_id, false);
        }
        {
            let mut state = self.inner.state.borrow_mut();
            state.disconnect_toast = Some(toast);
            state.fallback_visible = show_fallback;
        }
        self.inner.changes.notify(&ConnectionStatus::Disconnected);
    }
}

impl ConnectivityReporter for ConnectionMonitor {
    fn report(&self, connected: bool) {
        ConnectionMonitor::report(self, connected);
    }
}

impl fmt::Debug for ConnectionMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionMonitor")
            .field("state", &*self.inner.state.borrow())
            .field("running", &self.inner.running.get())
            .finish_non_exhaustive()
    }
}
