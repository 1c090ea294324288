//! Browser bindings (feature `web`).
//!
//! [`WebDocument`] implements the platform seams over `web-sys`:
//!
//! - view containers are `.view` elements with id `<viewId>-view`, hidden by
//!   the `hidden` CSS class;
//! - the location is `pathname + search`, pushed with `history.pushState`;
//! - toasts are `div.toast` elements appended to `#toast-container`.
//!
//! [`BrowserSpawner`] runs request tasks on the page's microtask queue.
//!
//! [`install_link_delegation`] and [`install_popstate`] connect the page's
//! events to a [`Router`]. Both return an [`EventListener`] that unregisters
//! on drop, so keep it alive for as long as the page runs.

use crate::host::{BrowserLocation, ViewHost};
use crate::router::Router;
use crate::toast::{Toast, ToastHost, ToastId};
use crate::transition::Transition;
use crate::{trace_log, warn_log};
use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};
use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use futures::FutureExt;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, Event, EventTarget, MouseEvent, Window};

/// Class marking a routable view container.
pub const VIEW_CLASS: &str = "view";
/// Class hiding a view container.
pub const HIDDEN_CLASS: &str = "hidden";
/// Attribute carrying a navigation target on clickable elements.
pub const NAV_ATTRIBUTE: &str = "data-nav";
/// Id of the toast container.
pub const TOAST_CONTAINER_ID: &str = "toast-container";

/// The live page.
#[derive(Debug, Clone)]
pub struct WebDocument {
    window: Window,
    document: Document,
}

impl WebDocument {
    /// Bind to the current window, `None` outside a browser.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    fn element(&self, element_id: &str) -> Option<Element> {
        self.document.get_element_by_id(element_id)
    }
}

impl ViewHost for WebDocument {
    fn view_ids(&self) -> Vec<String> {
        let Ok(nodes) = self.document.query_selector_all(&format!(".{}", VIEW_CLASS)) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| element.id())
            .filter(|id| !id.is_empty())
            .collect()
    }

    fn set_hidden(&self, element_id: &str, hidden: bool) -> bool {
        let Some(element) = self.element(element_id) else {
            return false;
        };
        let _ = element.class_list().toggle_with_force(HIDDEN_CLASS, hidden);
        true
    }

    fn is_hidden(&self, element_id: &str) -> Option<bool> {
        self.element(element_id)
            .map(|element| element.class_list().contains(HIDDEN_CLASS))
    }

    fn set_title(&self, title: &str) {
        self.document.set_title(title);
    }

    fn play_transition(
        &self,
        element_id: &str,
        transition: Transition,
    ) -> LocalBoxFuture<'static, ()> {
        let (Some(class), Some(element)) = (transition.css_class(), self.element(element_id))
        else {
            return future::ready(()).boxed_local();
        };

        let (ended, animation_ended) = oneshot::channel::<()>();
        let mut ended = Some(ended);
        let callback = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
            if let Some(ended) = ended.take() {
                let _ = ended.send(());
            }
        }));
        let listener = EventListener::register(element.clone().into(), "animationend", callback)
            .map_err(|err| {
                warn_log!("No animationend listener: {:?}", err);
            })
            .ok();

        let _ = element.class_list().add_1(&class);
        let timeout = sleep(transition.duration());
        async move {
            future::select(animation_ended, timeout).await;
            drop(listener);
            let _ = element.class_list().remove_1(&class);
        }
        .boxed_local()
    }
}

impl BrowserLocation for WebDocument {
    fn current(&self) -> String {
        let location = self.window.location();
        let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
        let search = location.search().unwrap_or_default();
        format!("{}{}", pathname, search)
    }

    fn push_state(&self, path: &str) {
        match self.window.history() {
            Ok(history) => {
                if let Err(err) = history.push_state_with_url(&JsValue::NULL, "", Some(path)) {
                    warn_log!("pushState('{}') failed: {:?}", path, err);
                }
            }
            Err(err) => {
                warn_log!("History API unavailable: {:?}", err);
            }
        }
    }

    fn back(&self) {
        if let Ok(history) = self.window.history() {
            let _ = history.back();
        }
    }
}

impl ToastHost for WebDocument {
    fn show(&self, toast: &Toast) {
        let Some(container) = self.element(TOAST_CONTAINER_ID) else {
            warn_log!("No #{} element, dropping toast", TOAST_CONTAINER_ID);
            return;
        };
        let Ok(element) = self.document.create_element("div") else {
            return;
        };
        element.set_class_name(&format!("toast toast-{}", toast.kind.as_str()));
        let _ = element.set_attribute("data-toast-id", &toast.id.0.to_string());
        element.set_text_content(Some(&toast.message));
        if container.append_child(&element).is_err() {
            return;
        }

        if let Some(timeout) = toast.timeout {
            let expired = sleep(timeout);
            spawn_local(async move {
                expired.await;
                element.remove();
            });
        }
    }

    fn dismiss(&self, id: ToastId) {
        let selector = format!("[data-toast-id=\"{}\"]", id.0);
        if let Ok(Some(element)) = self.document.query_selector(&selector) {
            element.remove();
        }
    }
}

/// Resolve after `duration`, via `setTimeout`.
pub fn sleep(duration: Duration) -> LocalBoxFuture<'static, ()> {
    let Some(window) = web_sys::window() else {
        return future::ready(()).boxed_local();
    };
    let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
    });
    async move {
        let _ = JsFuture::from(promise).await;
    }
    .boxed_local()
}

/// [`LocalSpawn`] over `wasm_bindgen_futures::spawn_local`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        spawn_local(future);
        Ok(())
    }
}

/// A registered DOM event listener, removed on drop.
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    fn register(
        target: EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.event,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

impl std::fmt::Debug for EventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListener")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Route clicks on `[data-nav]` elements through `router`.
///
/// Modified clicks (ctrl, meta, shift, alt, non-primary button) keep their
/// default behaviour so "open in new tab" still works.
pub fn install_link_delegation(
    router: &Router,
    document: &Document,
) -> Result<EventListener, JsValue> {
    let router = router.clone();
    let callback = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
        let Some(target) = navigation_target(&event) else {
            return;
        };
        event.prevent_default();
        trace_log!("Delegated navigation to '{}'", target);
        let navigation = router.follow_link(&target);
        spawn_local(async move {
            let _ = navigation.await;
        });
    }));
    EventListener::register(document.clone().into(), "click", callback)
}

/// Resync `router` on browser back/forward.
pub fn install_popstate(router: &Router, window: &Window) -> Result<EventListener, JsValue> {
    let router = router.clone();
    let callback = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
        let navigation = router.handle_popstate();
        spawn_local(async move {
            let _ = navigation.await;
        });
    }));
    EventListener::register(window.clone().into(), "popstate", callback)
}

fn navigation_target(event: &Event) -> Option<String> {
    if event.default_prevented() {
        return None;
    }
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        let modified =
            mouse.meta_key() || mouse.ctrl_key() || mouse.shift_key() || mouse.alt_key();
        if mouse.button() != 0 || modified {
            return None;
        }
    }
    let element = event.target()?.dyn_into::<Element>().ok()?;
    let link = element.closest(&format!("[{}]", NAV_ATTRIBUTE)).ok()??;
    link.get_attribute(NAV_ATTRIBUTE).filter(|target| !target.is_empty())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    fn overlay(document: &WebDocument, id: &str) -> Element {
        let element = document.document.create_element("div").unwrap();
        element.set_id(id);
        element.set_class_name(VIEW_CLASS);
        let root = document.document.document_element().unwrap();
        root.append_child(&element).unwrap();
        element
    }

    #[wasm_bindgen_test]
    async fn test_transition_ends_on_animationend() {
        let document = WebDocument::new().unwrap();
        let element = overlay(&document, "event-view");
        let transition = Transition::fade(60_000);
        let class = transition.css_class().unwrap();

        let playing = document.play_transition("event-view", transition);
        assert!(element.class_list().contains(&class));
        element
            .dispatch_event(&Event::new("animationend").unwrap())
            .unwrap();

        let deadline = sleep(Duration::from_secs(1));
        let finished = matches!(
            future::select(playing, deadline).await,
            future::Either::Left(_)
        );
        assert!(finished);
        assert!(!element.class_list().contains(&class));
        element.remove();
    }

    #[wasm_bindgen_test]
    async fn test_transition_ends_after_duration() {
        let document = WebDocument::new().unwrap();
        let element = overlay(&document, "profile-view");
        let transition = Transition::fade(20);
        let class = transition.css_class().unwrap();

        document.play_transition("profile-view", transition).await;

        assert!(!element.class_list().contains(&class));
        element.remove();
    }
}
