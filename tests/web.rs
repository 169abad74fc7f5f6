//! Browser tests for the exports the extension scripts call.
//!
//! Run with: wasm-pack test --headless --chrome
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_restricted_pages_cannot_capture() {
    assert!(!markit::can_capture("chrome://extensions"));
    assert!(!markit::can_capture("chrome-extension://abcdef/popup.html"));
    assert!(!markit::can_capture("about:blank"));
}

#[wasm_bindgen_test]
fn test_regular_pages_can_capture() {
    assert!(markit::can_capture("https://example.com/article"));
    assert!(markit::can_capture("http://localhost:8080/docs"));
}
