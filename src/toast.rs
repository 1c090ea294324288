//! Toast notifications.
//!
//! [`Notifier`] hands out [`ToastId`]s and forwards toasts to a
//! [`ToastHost`], which renders them (into `#toast-container` in the
//! browser) and takes care of auto-dismissal. Transient toasts carry a
//! timeout; persistent ones stay until [`Notifier::dismiss`] is called.
//!
//! The core only raises toasts itself for connectivity changes; feature
//! modules use the same notifier for their own feedback.

use crate::config::ToastConfig;
use crate::trace_log;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Identifier of a shown toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

/// Severity, mapped to styling by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    /// Neutral information
    Info,
    /// Something completed
    Success,
    /// Degraded but working
    Warning,
    /// Something failed
    Error,
}

impl ToastKind {
    /// Lowercase name, used as a CSS modifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A toast to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Id used to dismiss it
    pub id: ToastId,
    /// Severity
    pub kind: ToastKind,
    /// Text shown to the user
    pub message: String,
    /// Auto-dismiss delay; `None` keeps it until dismissed
    pub timeout: Option<Duration>,
}

impl Toast {
    /// Check if the toast stays until dismissed
    pub fn is_persistent(&self) -> bool {
        self.timeout.is_none()
    }
}

/// Renders toasts.
pub trait ToastHost {
    /// Show `toast`, scheduling its removal if it has a timeout.
    fn show(&self, toast: &Toast);

    /// Remove a toast. Unknown or already removed ids are ignored.
    fn dismiss(&self, id: ToastId);
}

/// Entry point for raising toasts.
///
/// Cloning yields another handle sharing the same id sequence.
#[derive(Clone)]
pub struct Notifier {
    host: Rc<dyn ToastHost>,
    next_id: Rc<Cell<u64>>,
    config: ToastConfig,
}

impl Notifier {
    /// Create a notifier rendering through `host`.
    pub fn new(host: Rc<dyn ToastHost>, config: ToastConfig) -> Self {
        Self {
            host,
            next_id: Rc::new(Cell::new(1)),
            config,
        }
    }

    /// Transient informational toast.
    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Info, message.into(), Some(self.config.timeout))
    }

    /// Transient success toast.
    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Success, message.into(), Some(self.config.timeout))
    }

    /// Transient warning toast.
    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Warning, message.into(), Some(self.config.timeout))
    }

    /// Transient error toast.
    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Error, message.into(), Some(self.config.timeout))
    }

    /// Toast that stays until [`dismiss`](Self::dismiss)ed.
    pub fn persistent(&self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        self.show(kind, message.into(), None)
    }

    /// Remove a toast.
    pub fn dismiss(&self, id: ToastId) {
        trace_log!("Dismissing toast {:?}", id);
        self.host.dismiss(id);
    }

    fn show(&self, kind: ToastKind, message: String, timeout: Option<Duration>) -> ToastId {
        let id = ToastId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let toast = Toast {
            id,
            kind,
            message,
            timeout,
        };
        trace_log!("Showing {} toast {:?}: {}", kind.as_str(), id, toast.message);
        self.host.show(&toast);
        id
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("next_id", &self.next_id.get())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
