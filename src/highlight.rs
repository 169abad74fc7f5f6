/// Data structures for saved highlights
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag applied when the capture request carries none
pub const DEFAULT_TAG: &str = "General";

/// Wall-clock formats accepted besides RFC 3339, tried in order.
/// The last one is what older versions of the extension wrote (`toLocaleString`).
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y, %I:%M:%S %p",
];

const DISPLAY_FORMAT: &str = "%-m/%-d/%Y %H:%M";

/// A saved excerpt of page text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HighlightRecord {
    pub text: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub id: String,
}

impl HighlightRecord {
    /// Build a fresh record for a capture. `text` must already be trimmed.
    pub fn new(text: String, source: String, tag: Option<&str>, now: DateTime<Local>) -> HighlightRecord {
        let tag = tag
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TAG);

        HighlightRecord {
            text,
            source,
            date: now.to_rfc3339_opts(SecondsFormat::Secs, false),
            tags: vec![tag.to_string()],
            id: Uuid::new_v4().to_string(),
        }
    }

    pub fn normalized_text(&self) -> String {
        self.text.trim().to_lowercase()
    }

    /// Dedup predicate: case-insensitive trimmed text and exact source
    pub fn same_highlight(&self, other: &HighlightRecord) -> bool {
        self.source == other.source && self.normalized_text() == other.normalized_text()
    }

    /// Give records stored without an id a stable one derived from their content
    pub fn ensure_id(&mut self) {
        if self.id.is_empty() {
            let key = format!("{}\u{0}{}\u{0}{}", self.text, self.date, self.source);
            self.id = Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string();
        }
    }

    /// Creation time as local wall-clock time
    pub fn local_date(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }

    /// Date as shown in the list; the raw string when it cannot be parsed
    pub fn display_date(&self) -> String {
        match self.local_date() {
            Some(date) => date.format(DISPLAY_FORMAT).to_string(),
            None => self.date.clone(),
        }
    }

    pub fn is_on_day(&self, day: NaiveDate) -> bool {
        self.local_date().is_some_and(|d| d.date() == day)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

/// Parse a stored timestamp into local wall-clock time
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Local).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, source: &str, date: &str) -> HighlightRecord {
        HighlightRecord {
            text: text.to_string(),
            source: source.to_string(),
            date: date.to_string(),
            tags: Vec::new(),
            id: String::new(),
        }
    }

    #[test]
    fn test_new_record_defaults_tag() {
        let record = HighlightRecord::new("Hello".to_string(), "https://a.com".to_string(), Some("  "), Local::now());

        assert_eq!(record.tags, vec![DEFAULT_TAG.to_string()]);
        assert!(!record.id.is_empty());
        assert!(record.local_date().is_some());
    }

    #[test]
    fn test_new_record_keeps_tag() {
        let record = HighlightRecord::new("Hello".to_string(), "https://a.com".to_string(), Some(" Rust "), Local::now());
        assert_eq!(record.tags, vec!["Rust".to_string()]);
    }

    #[test]
    fn test_same_highlight_normalizes_text_only() {
        let a = record("Hello World", "http://a.com", "2024-01-01T00:00:00Z");
        let b = record(" hello world ", "http://a.com", "2024-02-01T00:00:00Z");
        let c = record("Hello World", "http://A.com", "2024-01-01T00:00:00Z");

        assert!(a.same_highlight(&b));
        assert!(!a.same_highlight(&c));
    }

    #[test]
    fn test_ensure_id_is_deterministic() {
        let mut a = record("Hello", "http://a.com", "2024-01-01T00:00:00");
        let mut b = a.clone();
        a.ensure_id();
        b.ensure_id();

        assert!(!a.id.is_empty());
        assert_eq!(a.id, b.id);

        let mut c = record("Hello", "http://a.com", "2024-01-02T00:00:00");
        c.ensure_id();
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_ensure_id_keeps_existing() {
        let mut a = record("Hello", "http://a.com", "2024-01-01T00:00:00");
        a.id = "fixed".to_string();
        a.ensure_id();
        assert_eq!(a.id, "fixed");
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(15, 4, 5).unwrap();

        assert_eq!(parse_date("2024-06-01T15:04:05"), Some(expected));
        assert_eq!(parse_date("2024-06-01T15:04:05.250").map(|d| d.date()), Some(expected.date()));
        assert_eq!(parse_date("2024-06-01 15:04:05"), Some(expected));
        assert_eq!(parse_date("6/1/2024, 3:04:05 PM"), Some(expected));
        assert!(parse_date("2024-06-01T15:04:05+02:00").is_some());
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_display_date() {
        let r = record("x", "y", "2024-06-01T09:05:00");
        assert_eq!(r.display_date(), "6/1/2024 09:05");

        let bad = record("x", "y", "yesterday-ish");
        assert_eq!(bad.display_date(), "yesterday-ish");
    }

    #[test]
    fn test_has_tag_case_insensitive() {
        let mut r = record("x", "y", "2024-06-01T09:05:00");
        r.tags = vec!["Research".to_string()];

        assert!(r.has_tag("research"));
        assert!(r.has_tag("RESEARCH"));
        assert!(!r.has_tag("resear"));
    }

    #[test]
    fn test_deserialize_legacy_record() {
        let json = r#"{"text":"Hi","source":"https://a.com","date":"1/2/2024, 10:00:00 AM"}"#;
        let r: HighlightRecord = serde_json::from_str(json).unwrap();

        assert!(r.id.is_empty());
        assert!(r.tags.is_empty());
        assert!(r.is_on_day(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));
    }

    #[test]
    fn test_serialize_omits_empty_tags() {
        let r = record("Hi", "https://a.com", "2024-01-01T00:00:00");
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("tags"));
    }
}
