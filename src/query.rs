/// Search, date-range and tag filtering over a highlight snapshot

use crate::domain::hostname;
use crate::highlight::HighlightRecord;
use chrono::{Days, Months, NaiveDateTime};
use std::cmp::Reverse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateRange {
    pub const ALL: [DateRange; 4] = [DateRange::All, DateRange::Today, DateRange::Week, DateRange::Month];

    pub fn label(self) -> &'static str {
        match self {
            DateRange::All => "All",
            DateRange::Today => "Today",
            DateRange::Week => "This Week",
            DateRange::Month => "This Month",
        }
    }

    /// Earliest local time a record may carry to pass this range
    pub fn cutoff(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let today = now.date().and_hms_opt(0, 0, 0)?;
        match self {
            DateRange::All => None,
            DateRange::Today => Some(today),
            DateRange::Week => today.checked_sub_days(Days::new(7)),
            DateRange::Month => today.checked_sub_months(Months::new(1)),
        }
    }
}

/// Current search/filter selection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub search: String,
    pub date_range: DateRange,
    pub tag: Option<String>,
}

impl Query {
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.date_range != DateRange::All || self.tag.is_some()
    }

    /// Date range, then search, then tag, then newest first
    pub fn apply(&self, snapshot: &[HighlightRecord], now: NaiveDateTime) -> FilterResult {
        let cutoff = self.date_range.cutoff(now);
        let term = self.search.trim().to_lowercase();

        let mut records: Vec<HighlightRecord> = snapshot
            .iter()
            .filter(|h| match cutoff {
                Some(cutoff) => h.local_date().is_some_and(|d| d >= cutoff),
                None => true,
            })
            .filter(|h| term.is_empty() || matches_search(h, &term))
            .filter(|h| self.tag.as_deref().is_none_or(|tag| h.has_tag(tag)))
            .cloned()
            .collect();

        sort_newest_first(&mut records);

        FilterResult {
            records,
            total: snapshot.len(),
        }
    }
}

/// `term` must already be lowercased
pub fn matches_search(highlight: &HighlightRecord, term: &str) -> bool {
    let source_match = match hostname(&highlight.source) {
        Some(host) => host.to_lowercase().contains(term) || highlight.source.to_lowercase().contains(term),
        None => highlight.source.to_lowercase().contains(term),
    };

    highlight.text.to_lowercase().contains(term)
        || source_match
        || highlight.display_date().to_lowercase().contains(term)
}

/// Stable sort by date descending; unparseable dates go last
pub fn sort_newest_first(records: &mut [HighlightRecord]) {
    records.sort_by_cached_key(|h| Reverse(h.local_date()));
}

/// Filtered records plus the size of the snapshot they came from
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterResult {
    pub records: Vec<HighlightRecord>,
    pub total: usize,
}

impl FilterResult {
    pub fn filtered(&self) -> usize {
        self.records.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// "Showing X of Y highlights" while a filter is active
    pub fn summary(&self, query: &Query) -> Option<String> {
        query
            .is_active()
            .then(|| format!("Showing {} of {} highlights", self.filtered(), self.total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(text: &str, source: &str, date: &str) -> HighlightRecord {
        let mut r = HighlightRecord {
            text: text.to_string(),
            source: source.to_string(),
            date: date.to_string(),
            tags: Vec::new(),
            id: String::new(),
        };
        r.ensure_id();
        r
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
    }

    #[test]
    fn test_today_boundary() {
        let snapshot = vec![
            record("late", "https://a.com", "2024-05-31T23:59:00"),
            record("early", "https://a.com", "2024-06-01T00:00:01"),
        ];
        let query = Query {
            date_range: DateRange::Today,
            ..Query::default()
        };

        let result = query.apply(&snapshot, at(2024, 6, 1, 12, 0, 0));

        assert_eq!(result.filtered(), 1);
        assert_eq!(result.records[0].text, "early");
        assert_eq!(result.total(), 2);
    }

    #[test]
    fn test_week_and_month_cutoffs() {
        let now = at(2024, 3, 31, 10, 0, 0);

        assert_eq!(DateRange::Week.cutoff(now), Some(at(2024, 3, 24, 0, 0, 0)));
        // Calendar month, clamped to the end of February
        assert_eq!(DateRange::Month.cutoff(now), Some(at(2024, 2, 29, 0, 0, 0)));
        assert_eq!(DateRange::All.cutoff(now), None);
    }

    #[test]
    fn test_stricter_range_never_grows() {
        let now = at(2024, 6, 15, 12, 0, 0);
        let snapshot = vec![
            record("a", "https://a.com", "2024-06-15T08:00:00"),
            record("b", "https://a.com", "2024-06-10T08:00:00"),
            record("c", "https://a.com", "2024-05-20T08:00:00"),
            record("d", "https://a.com", "2023-01-01T08:00:00"),
            record("e", "https://a.com", "garbage"),
        ];

        let counts: Vec<usize> = [DateRange::All, DateRange::Month, DateRange::Week, DateRange::Today]
            .into_iter()
            .map(|date_range| {
                Query {
                    date_range,
                    ..Query::default()
                }
                .apply(&snapshot, now)
                .filtered()
            })
            .collect();

        assert_eq!(counts, vec![5, 3, 2, 1]);
    }

    #[test]
    fn test_search_by_source() {
        let snapshot = vec![
            record("one", "http://a.com/x", "2024-06-01T00:00:00"),
            record("two", "http://b.com/y", "2024-06-01T00:00:00"),
        ];
        let query = Query {
            search: "a.com".to_string(),
            ..Query::default()
        };

        let result = query.apply(&snapshot, at(2024, 6, 1, 12, 0, 0));

        assert_eq!(result.filtered(), 1);
        assert_eq!(result.records[0].text, "one");
    }

    #[test]
    fn test_search_text_case_insensitive_and_trimmed() {
        let snapshot = vec![
            record("Rust Ownership", "https://a.com", "2024-06-01T00:00:00"),
            record("Borrowing", "https://a.com", "2024-06-01T00:00:00"),
        ];
        let query = Query {
            search: "  OWNER ".to_string(),
            ..Query::default()
        };

        let result = query.apply(&snapshot, at(2024, 6, 1, 12, 0, 0));
        assert_eq!(result.filtered(), 1);
    }

    #[test]
    fn test_search_unparseable_source_and_date() {
        let snapshot = vec![
            record("x", "my notebook", "2024-06-01T09:30:00"),
            record("y", "https://a.com", "2024-06-02T09:30:00"),
        ];

        let by_source = Query {
            search: "notebook".to_string(),
            ..Query::default()
        };
        assert_eq!(by_source.apply(&snapshot, at(2024, 6, 3, 0, 0, 0)).filtered(), 1);

        let by_date = Query {
            search: "6/2/2024".to_string(),
            ..Query::default()
        };
        let result = by_date.apply(&snapshot, at(2024, 6, 3, 0, 0, 0));
        assert_eq!(result.filtered(), 1);
        assert_eq!(result.records[0].text, "y");
    }

    #[test]
    fn test_tag_filter() {
        let mut tagged = record("tagged", "https://a.com", "2024-06-01T00:00:00");
        tagged.tags = vec!["Research".to_string()];
        let snapshot = vec![tagged, record("plain", "https://a.com", "2024-06-01T00:00:00")];

        let query = Query {
            tag: Some("research".to_string()),
            ..Query::default()
        };

        let result = query.apply(&snapshot, at(2024, 6, 1, 12, 0, 0));
        assert_eq!(result.filtered(), 1);
        assert_eq!(result.records[0].text, "tagged");
    }

    #[test]
    fn test_sorted_newest_first_with_unparseable_last() {
        let snapshot = vec![
            record("bad", "https://a.com", "unknown"),
            record("old", "https://a.com", "2024-01-01T00:00:00"),
            record("new", "https://a.com", "2024-06-01T00:00:00"),
        ];

        let result = Query::default().apply(&snapshot, at(2024, 6, 1, 12, 0, 0));
        let order: Vec<&str> = result.records.iter().map(|r| r.text.as_str()).collect();

        assert_eq!(order, vec!["new", "old", "bad"]);
    }

    #[test]
    fn test_output_is_subset() {
        let snapshot = vec![
            record("alpha", "https://a.com", "2024-06-01T00:00:00"),
            record("beta", "https://b.com", "2024-05-01T00:00:00"),
        ];
        let query = Query {
            search: "a".to_string(),
            date_range: DateRange::Month,
            tag: None,
        };

        let result = query.apply(&snapshot, at(2024, 6, 1, 12, 0, 0));
        assert!(result.records.iter().all(|r| snapshot.contains(r)));
    }

    #[test]
    fn test_summary_only_when_active() {
        let result = FilterResult {
            records: Vec::new(),
            total: 4,
        };

        assert_eq!(result.summary(&Query::default()), None);

        let query = Query {
            date_range: DateRange::Week,
            ..Query::default()
        };
        assert_eq!(result.summary(&query), Some("Showing 0 of 4 highlights".to_string()));
    }
}
