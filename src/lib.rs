/// MarkIt - Chrome Extension for saving web highlights
/// Built with Rust + WASM + Yew

mod capture;
mod document;
mod domain;
mod error;
mod export;
mod highlight;
mod platform;
mod query;
mod settings;
mod state;
mod storage;
mod view;
pub mod ui;

use capture::CaptureOutcome;
use error::HighlightError;
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Context-menu capture, called from the background worker.
/// Failures are logged and never surface to the user.
#[wasm_bindgen]
pub async fn capture_selection(selection: String, page_url: String, tag: Option<String>) {
    match capture::capture(&selection, &page_url, tag.as_deref()).await {
        Ok(CaptureOutcome::Saved(_)) => {}
        Ok(CaptureOutcome::Duplicate) => log::info!("Highlight already saved for {}", page_url),
        Err(e @ (HighlightError::RestrictedPage(_) | HighlightError::EmptySelection)) => log::warn!("{}", e),
        Err(e) => log::error!("Capture failed: {}", e),
    }
}

/// Whether the context menu should offer capture on this page
#[wasm_bindgen]
pub fn can_capture(page_url: &str) -> bool {
    !domain::is_restricted_page(page_url)
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the options page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}
