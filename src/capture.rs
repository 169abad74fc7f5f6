/// Capture pipeline: selection + page URL -> stored highlight

use crate::domain::is_restricted_page;
use crate::error::{HighlightError, Result};
use crate::highlight::HighlightRecord;
use crate::platform;
use crate::storage::HighlightStore;
use chrono::{DateTime, Local};

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Saved(HighlightRecord),
    Duplicate,
}

/// Refuse restricted pages and blank selections; returns the trimmed text
pub fn validate<'a>(selection: &'a str, page_url: &str) -> Result<&'a str> {
    if is_restricted_page(page_url) {
        return Err(HighlightError::RestrictedPage(page_url.to_string()));
    }
    let text = selection.trim();
    if text.is_empty() {
        return Err(HighlightError::EmptySelection);
    }
    Ok(text)
}

/// Add a capture to `store` unless an equivalent highlight is already there
pub fn record_capture(
    store: &mut HighlightStore,
    text: &str,
    page_url: &str,
    tag: Option<&str>,
    now: DateTime<Local>,
) -> CaptureOutcome {
    let record = HighlightRecord::new(text.to_string(), page_url.to_string(), tag, now);
    if store.insert(record.clone()) {
        CaptureOutcome::Saved(record)
    } else {
        CaptureOutcome::Duplicate
    }
}

/// Full pipeline: validate, load, dedup, persist, notify
pub async fn capture(selection: &str, page_url: &str, tag: Option<&str>) -> Result<CaptureOutcome> {
    let text = validate(selection, page_url)?;

    let mut store = platform::load_highlights().await?;
    let outcome = record_capture(&mut store, text, page_url, tag, Local::now());

    if let CaptureOutcome::Saved(record) = &outcome {
        platform::save_highlights(&store).await?;
        log::info!("Saved highlight {} from {}", record.id, page_url);
        platform::notify_saved(record).await?;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> HighlightStore {
        HighlightStore::from_records(vec![HighlightRecord {
            text: "Hello World".to_string(),
            source: "http://a.com".to_string(),
            date: "2024-01-01T00:00:00Z".to_string(),
            tags: Vec::new(),
            id: String::new(),
        }])
    }

    #[test]
    fn test_validate_trims() {
        assert_eq!(validate("  some text \n", "https://a.com").unwrap(), "some text");
    }

    #[test]
    fn test_validate_rejects_blank() {
        assert!(matches!(validate("   ", "https://a.com"), Err(HighlightError::EmptySelection)));
    }

    #[test]
    fn test_validate_refuses_restricted_page() {
        let err = validate("text", "chrome://settings").unwrap_err();
        assert!(matches!(err, HighlightError::RestrictedPage(url) if url == "chrome://settings"));
    }

    #[test]
    fn test_duplicate_capture_leaves_store_unchanged() {
        let mut store = existing();
        let before = store.clone();

        let text = validate(" hello world ", "http://a.com").unwrap();
        let outcome = record_capture(&mut store, text, "http://a.com", None, Local::now());

        assert_eq!(outcome, CaptureOutcome::Duplicate);
        assert_eq!(store, before);
    }

    #[test]
    fn test_capture_twice_stores_once() {
        let mut store = HighlightStore::default();

        let first = record_capture(&mut store, "Quote", "https://a.com", None, Local::now());
        let second = record_capture(&mut store, "quote", "https://a.com", Some("Other"), Local::now());

        assert!(matches!(first, CaptureOutcome::Saved(_)));
        assert_eq!(second, CaptureOutcome::Duplicate);
        assert_eq!(store.highlights.len(), 1);
    }

    #[test]
    fn test_new_capture_prepended_with_default_tag() {
        let mut store = existing();

        let outcome = record_capture(&mut store, "Another", "http://a.com", Some(""), Local::now());

        let CaptureOutcome::Saved(record) = outcome else {
            panic!("expected a saved record");
        };
        assert_eq!(store.highlights.len(), 2);
        assert_eq!(store.highlights[0], record);
        assert_eq!(record.tags, vec!["General".to_string()]);
    }

    #[test]
    fn test_same_text_other_source_is_new() {
        let mut store = existing();
        let outcome = record_capture(&mut store, "Hello World", "http://b.com", None, Local::now());

        assert!(matches!(outcome, CaptureOutcome::Saved(_)));
        assert_eq!(store.highlights.len(), 2);
    }
}
