//! Logging facade used across the crate.
//!
//! Every module logs through the macros below instead of naming a backend
//! directly, so the same source builds against [`log`](https://docs.rs/log)
//! or [`tracing`](https://docs.rs/tracing). The two features are **mutually
//! exclusive**; with neither enabled the macros expand to nothing.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! What gets logged where:
//!
//! - `info_log!`: route registration, navigation start/complete,
//!   connectivity restored.
//! - `warn_log!`: routing misses, connectivity lost, missing view containers.
//! - `error_log!`: panicking event-bus subscribers.
//! - `debug_log!`: idempotent or superseded navigations, cache invalidation.
//! - `trace_log!`: cache hits/misses, skipped health probes.
//!
//! ```ignore
//! use club_navigator::{debug_log, warn_log};
//!
//! debug_log!("Navigation to '{}' is a no-op", path);
//! warn_log!("No route matches '{}'", path);
//! ```

/// Emit a **trace**-level log message through the configured backend.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// Emit a **debug**-level log message through the configured backend.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// Emit an **info**-level log message through the configured backend.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// Emit a **warn**-level log message through the configured backend.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// Emit an **error**-level log message through the configured backend.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}
