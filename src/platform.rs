/// Bridge to the extension platform: chrome.storage, downloads, clipboard,
/// notifications, tabs and the jsPDF renderer

use crate::document::DocumentLayout;
use crate::error::{HighlightError, Result};
use crate::highlight::HighlightRecord;
use crate::settings::Settings;
use crate::storage::{HighlightStore, HIGHLIGHTS_KEY};
use crate::view::saved_message;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

/// How long the "highlight saved" notification stays up
pub const NOTIFICATION_DISMISS_MS: u32 = 3000;

/// Runtime message broadcast after a capture
pub const HIGHLIGHT_SAVED: &str = "highlightSaved";

/// Runtime message broadcast after the options page saves
pub const SETTINGS_UPDATED: &str = "settings-updated";

const LOCAL: &str = "local";
const SYNC: &str = "sync";

// Import JS bridge functions
#[wasm_bindgen(module = "/js/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(area: &str, key: Option<String>) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(area: &str, items: JsValue) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn copyText(text: &str) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn pickTextFile(accept: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn downloadFile(content: &str, filename: &str, mime: &str) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn renderPdf(layout: JsValue, filename: &str) -> std::result::Result<(), JsValue>;

    fn isPdfLibraryReady() -> bool;

    fn openTabs(urls: JsValue);

    fn showNotification(title: &str, message: &str, dismiss_ms: u32);

    fn onRuntimeMessage(action: &str, callback: &js_sys::Function) -> js_sys::Function;
}

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| HighlightError::Platform(format!("Failed to serialize: {:?}", e)))
}

fn from_js<T: DeserializeOwned + Default>(value: JsValue) -> Result<T> {
    if value.is_null() || value.is_undefined() {
        Ok(T::default())
    } else {
        serde_wasm_bindgen::from_value(value).map_err(|e| HighlightError::Storage(format!("Failed to parse storage: {:?}", e)))
    }
}

/// Load the `highlights` array; empty when nothing is stored
pub async fn load_highlights() -> Result<HighlightStore> {
    let value = getStorage(LOCAL, Some(HIGHLIGHTS_KEY.to_string()))
        .await
        .map_err(|e| HighlightError::Storage(format!("Failed to get storage: {}", js_error(e))))?;

    let items: Vec<serde_json::Value> = from_js(value)?;
    Ok(HighlightStore::from_values(items))
}

pub async fn save_highlights(store: &HighlightStore) -> Result<()> {
    let items = js_sys::Object::new();
    js_sys::Reflect::set(&items, &HIGHLIGHTS_KEY.into(), &to_js(store.records())?)
        .map_err(|e| HighlightError::Platform(js_error(e)))?;

    setStorage(LOCAL, items.into())
        .await
        .map_err(|e| HighlightError::Storage(format!("Failed to save storage: {}", js_error(e))))
}

/// Settings from the synced store; missing keys take their defaults
pub async fn load_settings() -> Result<Settings> {
    let value = getStorage(SYNC, None)
        .await
        .map_err(|e| HighlightError::Storage(format!("Failed to get settings: {}", js_error(e))))?;
    from_js(value)
}

pub async fn save_settings(settings: &Settings) -> Result<()> {
    let items = to_js(settings)?;
    setStorage(SYNC, items.clone())
        .await
        .map_err(|e| HighlightError::Storage(format!("Failed to save settings: {}", js_error(e))))?;

    let message = js_sys::Object::new();
    js_sys::Reflect::set(&message, &"type".into(), &SETTINGS_UPDATED.into())
        .and_then(|_| js_sys::Reflect::set(&message, &"payload".into(), &items))
        .map_err(|e| HighlightError::Platform(js_error(e)))?;

    // No listener being open is not an error for the options page
    if let Err(e) = sendRuntimeMessage(message.into()).await {
        log::debug!("settings-updated not delivered: {}", js_error(e));
    }
    Ok(())
}

/// Broadcast the saved record and raise the desktop notification
pub async fn notify_saved(record: &HighlightRecord) -> Result<()> {
    showNotification("Highlight Saved!", &saved_message(record), NOTIFICATION_DISMISS_MS);

    let data = to_js(record)?;
    let message = js_sys::Object::new();
    js_sys::Reflect::set(&message, &"action".into(), &HIGHLIGHT_SAVED.into())
        .and_then(|_| js_sys::Reflect::set(&message, &"data".into(), &data))
        .map_err(|e| HighlightError::Platform(js_error(e)))?;

    if let Err(e) = sendRuntimeMessage(message.into()).await {
        // The popup is usually closed, so nobody receives this
        log::debug!("highlightSaved not delivered: {}", js_error(e));
    }
    Ok(())
}

/// A runtime-message listener; removed from the platform when dropped
pub struct Subscription {
    unsubscribe: js_sys::Function,
    _callback: Closure<dyn FnMut(JsValue)>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Err(e) = self.unsubscribe.call0(&JsValue::NULL) {
            log::warn!("Failed to remove runtime listener: {}", js_error(e));
        }
    }
}

/// Call `callback` with the `data` of each runtime message whose `action` matches
pub fn listen(action: &str, callback: impl FnMut(JsValue) + 'static) -> Subscription {
    let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(JsValue)>);
    let unsubscribe = onRuntimeMessage(action, callback.as_ref().unchecked_ref());
    Subscription {
        unsubscribe,
        _callback: callback,
    }
}

pub fn download(content: &str, filename: &str, mime: &str) -> Result<()> {
    downloadFile(content, filename, mime).map_err(|e| HighlightError::Platform(format!("Download failed: {}", js_error(e))))
}

/// Clipboard API first, `execCommand("copy")` fallback inside the bridge
pub async fn copy_to_clipboard(text: &str) -> Result<()> {
    copyText(text)
        .await
        .map_err(|e| HighlightError::Platform(format!("Failed to copy: {}", js_error(e))))
}

pub fn pdf_library_ready() -> bool {
    isPdfLibraryReady()
}

pub fn render_pdf(layout: &DocumentLayout, filename: &str) -> Result<()> {
    renderPdf(to_js(layout)?, filename).map_err(|e| HighlightError::Platform(format!("Error generating PDF: {}", js_error(e))))
}

/// Let the user pick a file; None when the picker was dismissed
pub async fn pick_json_file() -> Result<Option<String>> {
    let contents = pickTextFile(".json")
        .await
        .map_err(|e| HighlightError::Platform(format!("Failed to read file: {}", js_error(e))))?;
    Ok(contents.as_string())
}

pub fn open_tabs(urls: &[String]) -> Result<()> {
    openTabs(to_js(urls)?);
    Ok(())
}
