//! Publish/subscribe primitive.
//!
//! [`EventBus`] is the channel the router broadcasts
//! [`NavigationEvent`](crate::NavigationEvent)s on, and the building block
//! feature modules use for their own ad hoc channels ("balance changed",
//! "login occurred").
//!
//! Delivery is synchronous and isolated: a subscriber that panics is logged
//! and skipped, the remaining subscribers still receive the payload, and
//! [`notify`](EventBus::notify) itself never panics.
//!
//! Isolation relies on unwinding. On targets built with `panic = "abort"`,
//! which includes the default `wasm32-unknown-unknown` setup, a panicking
//! subscriber aborts the whole program before any other subscriber runs.
//! Subscribers that can fail should return early or log instead of
//! panicking.
//!
//! # Example
//!
//! ```
//! use club_navigator::EventBus;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let bus = EventBus::<u32>::new();
//! let total = Rc::new(Cell::new(0));
//!
//! let sink = total.clone();
//! let subscription = bus.subscribe_fn(move |amount| sink.set(sink.get() + amount));
//!
//! bus.notify(&5);
//! subscription.unsubscribe();
//! bus.notify(&7);
//!
//! assert_eq!(total.get(), 5);
//! ```

use crate::{error_log, trace_log};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

/// Callback registered on an [`EventBus`].
///
/// Identity is the `Rc` allocation: registering a clone of the same `Rc`
/// twice keeps a single registration.
pub type Subscriber<T> = Rc<dyn Fn(&T)>;

struct Entry<T> {
    id: u64,
    callback: Subscriber<T>,
    once: bool,
}

struct BusInner<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

/// Synchronous publish/subscribe channel for payloads of type `T`.
///
/// Cloning the bus yields another handle to the same subscriber list.
pub struct EventBus<T> {
    inner: Rc<RefCell<BusInner<T>>>,
}

impl<T: 'static> EventBus<T> {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register `callback` and return a handle that removes it again.
    ///
    /// Registering the same callback (same `Rc`) twice has no additional
    /// effect; the returned handle refers to the existing registration.
    pub fn subscribe(&self, callback: Subscriber<T>) -> Subscription {
        self.register(callback, false)
    }

    /// Register a closure. Shorthand for `subscribe(Rc::new(f))`.
    pub fn subscribe_fn<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        self.register(Rc::new(callback), false)
    }

    /// Register a callback that fires at most once and then removes itself.
    pub fn once(&self, callback: Subscriber<T>) -> Subscription {
        self.register(callback, true)
    }

    /// Register a one-shot closure.
    pub fn once_fn<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        self.register(Rc::new(callback), true)
    }

    /// Remove `callback` if it is registered. Returns whether it was.
    pub fn unsubscribe(&self, callback: &Subscriber<T>) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.entries.len();
        inner
            .entries
            .retain(|entry| !Rc::ptr_eq(&entry.callback, callback));
        before != inner.entries.len()
    }

    /// Deliver `payload` to every current subscriber, in registration order.
    ///
    /// Subscribers may subscribe, unsubscribe or notify re-entrantly. A
    /// subscriber removed by an earlier one during this delivery is skipped.
    pub fn notify(&self, payload: &T) {
        let ids: Vec<u64> = self.inner.borrow().entries.iter().map(|e| e.id).collect();
        trace_log!("Notifying {} subscriber(s)", ids.len());

        for id in ids {
            let Some(callback) = self.take_for_delivery(id) else {
                continue;
            };
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(payload))) {
                error_log!(
                    "Event bus subscriber {} panicked: {}",
                    id,
                    panic_message(panic.as_ref())
                );
            }
        }
    }

    /// Remove every subscriber.
    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Return `true` if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    fn register(&self, callback: Subscriber<T>, once: bool) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = if let Some(existing) = inner
            .entries
            .iter()
            .find(|entry| Rc::ptr_eq(&entry.callback, &callback))
        {
            existing.id
        } else {
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push(Entry { id, callback, once });
            id
        };
        drop(inner);

        let weak: Weak<RefCell<BusInner<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().entries.retain(|entry| entry.id != id);
                }
            })),
        }
    }

    /// Look up a subscriber for delivery, removing it first if it is one-shot.
    fn take_for_delivery(&self, id: u64) -> Option<Subscriber<T>> {
        let mut inner = self.inner.borrow_mut();
        let index = inner.entries.iter().position(|entry| entry.id == id)?;
        if inner.entries[index].once {
            Some(inner.entries.remove(index).callback)
        } else {
            Some(inner.entries[index].callback.clone())
        }
    }
}

impl<T: 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.inner.borrow().entries.len())
            .finish()
    }
}

/// Handle returned by [`EventBus::subscribe`] and friends.
///
/// Dropping the handle leaves the subscription in place; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
pub struct Subscription {
    remove: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the subscription. Safe to call after the bus is gone.
    pub fn unsubscribe(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
