/// UI module exports
pub mod components;
pub mod options;
pub mod popup;

use wasm_bindgen::prelude::*;

/// Blocking browser alert; logged when there is no window
pub(crate) fn alert(message: &str) {
    match web_sys::window() {
        Some(window) => {
            if let Err(e) = window.alert_with_message(message) {
                log::error!("alert failed: {:?}", e);
            }
        }
        None => log::warn!("{}", message),
    }
}

pub(crate) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Run `f` once after `millis`
pub(crate) fn set_timeout(millis: i32, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(f);
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis) {
        log::error!("setTimeout failed: {:?}", e);
    }
}

/// Repeating timer, cleared when dropped
pub(crate) struct Interval {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Interval {
    pub(crate) fn new(millis: i32, f: impl FnMut() + 'static) -> Option<Interval> {
        let window = web_sys::window()?;
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), millis)
            .map_err(|e| log::error!("setInterval failed: {:?}", e))
            .ok()?;
        Some(Interval {
            handle,
            _callback: callback,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

/// A document-wide click listener, removed when dropped
pub(crate) struct DocumentClick {
    document: web_sys::Document,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl DocumentClick {
    pub(crate) fn listen(f: impl FnMut(web_sys::Event) + 'static) -> Option<DocumentClick> {
        let document = web_sys::window()?.document()?;
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(web_sys::Event)>);
        document
            .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
            .map_err(|e| log::error!("addEventListener failed: {:?}", e))
            .ok()?;
        Some(DocumentClick { document, callback })
    }
}

impl Drop for DocumentClick {
    fn drop(&mut self) {
        if let Err(e) = self
            .document
            .remove_event_listener_with_callback("click", self.callback.as_ref().unchecked_ref())
        {
            log::warn!("removeEventListener failed: {:?}", e);
        }
    }
}

/// Whether an event target lies outside `container`
pub(crate) fn is_outside(container: &web_sys::Node, target: Option<web_sys::EventTarget>) -> bool {
    match target.and_then(|t| t.dyn_into::<web_sys::Node>().ok()) {
        Some(node) => !container.contains(Some(&node)),
        None => true,
    }
}

/// Toggle the dark theme on the page body
pub(crate) fn apply_dark_mode(enabled: bool) {
    let Some(body) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.body()) else {
        return;
    };
    let result = if enabled {
        body.set_attribute("data-theme", "dark")
    } else {
        body.remove_attribute("data-theme")
    };
    if let Err(e) = result {
        log::warn!("Failed to apply theme: {:?}", e);
    }
}
