/// In-memory view of the `highlights` key in chrome.storage.local

use crate::highlight::HighlightRecord;
use serde::{Deserialize, Serialize};

/// Storage key holding the highlight array
pub const HIGHLIGHTS_KEY: &str = "highlights";

/// The stored highlight collection, newest insertion first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct HighlightStore {
    pub highlights: Vec<HighlightRecord>,
}

impl HighlightStore {
    /// Wrap a loaded snapshot, backfilling ids for records stored without one
    pub fn from_records(mut highlights: Vec<HighlightRecord>) -> Self {
        highlights.iter_mut().for_each(HighlightRecord::ensure_id);
        HighlightStore { highlights }
    }

    /// Wrap raw stored entries, dropping any that are not highlight-shaped
    pub fn from_values(items: Vec<serde_json::Value>) -> Self {
        HighlightStore::from_records(decode_records(items, "stored"))
    }

    pub fn is_duplicate(&self, candidate: &HighlightRecord) -> bool {
        self.highlights.iter().any(|h| h.same_highlight(candidate))
    }

    /// Prepend a record unless an equivalent one is already stored
    pub fn insert(&mut self, record: HighlightRecord) -> bool {
        if self.is_duplicate(&record) {
            return false;
        }
        self.highlights.insert(0, record);
        true
    }

    /// Remove the first record with the given id
    pub fn remove(&mut self, id: &str) -> Option<HighlightRecord> {
        self.highlights
            .iter()
            .position(|h| h.id == id)
            .map(|index| self.highlights.remove(index))
    }

    pub fn clear(&mut self) {
        self.highlights.clear();
    }

    /// Append imported records, skipping any that duplicate a stored one or an
    /// earlier entry of the same import. Returns how many were added.
    pub fn merge(&mut self, imported: Vec<HighlightRecord>) -> usize {
        let before = self.highlights.len();
        for mut record in imported {
            if record.text.trim().is_empty() || self.is_duplicate(&record) {
                continue;
            }
            record.ensure_id();
            self.highlights.push(record);
        }
        self.highlights.len() - before
    }

    /// Distinct tags in first-seen order
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.highlights.iter().flat_map(|h| h.tags.iter()) {
            if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    pub fn records(&self) -> &[HighlightRecord] {
        &self.highlights
    }
}

/// Decode entries one at a time; malformed ones are logged and skipped
pub fn decode_records(items: Vec<serde_json::Value>, origin: &str) -> Vec<HighlightRecord> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<HighlightRecord>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping {} entry: {}", origin, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_record(text: &str, source: &str, date: &str) -> HighlightRecord {
        let mut record = HighlightRecord {
            text: text.to_string(),
            source: source.to_string(),
            date: date.to_string(),
            tags: vec!["General".to_string()],
            id: String::new(),
        };
        record.ensure_id();
        record
    }

    #[test]
    fn test_store_default() {
        let store = HighlightStore::default();
        assert!(store.highlights.is_empty());
    }

    #[test]
    fn test_insert_prepends() {
        let mut store = HighlightStore::default();
        store.insert(create_test_record("first", "https://a.com", "2024-01-01T00:00:00"));
        store.insert(create_test_record("second", "https://a.com", "2024-01-02T00:00:00"));

        assert_eq!(store.highlights.len(), 2);
        assert_eq!(store.highlights[0].text, "second");
    }

    #[test]
    fn test_insert_same_highlight_twice_keeps_one() {
        let mut store = HighlightStore::default();
        assert!(store.insert(create_test_record("Hello World", "http://a.com", "2024-01-01T00:00:00Z")));
        assert!(!store.insert(create_test_record(" hello world ", "http://a.com", "2024-03-01T00:00:00Z")));

        assert_eq!(store.highlights.len(), 1);
        assert_eq!(store.highlights[0].text, "Hello World");
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut store = HighlightStore::default();
        let a = create_test_record("a", "https://a.com", "2024-01-01T00:00:00");
        let mut twin = a.clone();
        twin.text = "A".to_string();
        store.highlights = vec![
            a.clone(),
            create_test_record("b", "https://b.com", "2024-01-01T00:00:00"),
            twin,
        ];

        let removed = store.remove(&a.id);

        assert_eq!(removed.map(|r| r.text), Some("a".to_string()));
        assert_eq!(store.highlights.len(), 2);
        assert_eq!(store.highlights[0].text, "b");
        assert_eq!(store.highlights[1].text, "A");
    }

    #[test]
    fn test_remove_nonexistent() {
        let mut store = HighlightStore::default();
        store.insert(create_test_record("a", "https://a.com", "2024-01-01T00:00:00"));

        assert!(store.remove("missing").is_none());
        assert_eq!(store.highlights.len(), 1);
    }

    #[test]
    fn test_from_records_backfills_ids() {
        let mut raw = create_test_record("a", "https://a.com", "2024-01-01T00:00:00");
        raw.id = String::new();

        let store = HighlightStore::from_records(vec![raw]);

        assert!(!store.highlights[0].id.is_empty());
    }

    #[test]
    fn test_from_values_keeps_well_formed_entries() {
        let items: Vec<serde_json::Value> = serde_json::from_str(
            r#"[
                {"text": "good", "source": "https://a.com", "date": "2024-01-01T00:00:00"},
                {"source": "https://b.com"},
                42,
                {"text": "also good"}
            ]"#,
        )
        .unwrap();

        let store = HighlightStore::from_values(items);

        assert_eq!(store.highlights.len(), 2);
        assert_eq!(store.highlights[0].text, "good");
        assert_eq!(store.highlights[1].text, "also good");
        assert!(store.highlights.iter().all(|h| !h.id.is_empty()));
    }

    #[test]
    fn test_clear() {
        let mut store = HighlightStore::default();
        store.insert(create_test_record("a", "https://a.com", "2024-01-01T00:00:00"));
        store.clear();

        assert!(store.records().is_empty());
    }

    #[test]
    fn test_merge_skips_duplicates() {
        let mut store = HighlightStore::default();
        store.insert(create_test_record("Existing", "https://a.com", "2024-01-01T00:00:00"));

        let added = store.merge(vec![
            create_test_record("Existing", "https://a.com", "2024-01-01T00:00:00"),
            create_test_record("Fresh", "https://b.com", "2024-01-02T00:00:00"),
        ]);

        assert_eq!(added, 1);
        assert_eq!(store.highlights.len(), 2);
        assert_eq!(store.highlights[1].text, "Fresh");
    }

    #[test]
    fn test_merge_skips_empty_text() {
        let mut store = HighlightStore::default();
        let added = store.merge(vec![create_test_record("   ", "https://a.com", "2024-01-01T00:00:00")]);

        assert_eq!(added, 0);
        assert!(store.highlights.is_empty());
    }

    #[test]
    fn test_tags() {
        let mut store = HighlightStore::default();
        let mut a = create_test_record("a", "https://a.com", "2024-01-01T00:00:00");
        a.tags = vec!["Rust".to_string()];
        let mut b = create_test_record("b", "https://a.com", "2024-01-01T00:00:00");
        b.tags = vec!["rust".to_string(), "Web".to_string()];
        store.highlights = vec![a, b];

        assert_eq!(store.tags(), vec!["Rust".to_string(), "Web".to_string()]);
    }

    #[test]
    fn test_serialization_is_plain_array() {
        let mut store = HighlightStore::default();
        store.insert(create_test_record("a", "https://a.com", "2024-01-01T00:00:00"));

        let json = serde_json::to_string(&store).unwrap();
        assert!(json.starts_with('['));

        let deserialized: HighlightStore = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, store);
    }
}
