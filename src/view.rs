/// Per-item display data and clipboard formats

use crate::domain::display_domain;
use crate::highlight::HighlightRecord;
use chrono::NaiveDate;
use regex::RegexBuilder;

/// Characters of highlight text shown before truncating
pub const PREVIEW_CHARS: usize = 200;

/// Characters of highlight text quoted in the "saved" notification
pub const NOTIFICATION_CHARS: usize = 50;

/// Truncate to `max` characters, appending "..." when anything was cut
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// A run of preview text, flagged when it matches the search term
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

/// Split `text` into plain and matching runs of `term` (case-insensitive)
pub fn mark_matches(text: &str, term: &str) -> Vec<Segment> {
    let term = term.trim();
    let plain = || {
        vec![Segment {
            text: text.to_string(),
            matched: false,
        }]
    };
    if term.is_empty() {
        return plain();
    }

    let Ok(pattern) = RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build() else {
        return plain();
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(text) {
        if found.start() > last {
            segments.push(Segment {
                text: text[last..found.start()].to_string(),
                matched: false,
            });
        }
        segments.push(Segment {
            text: found.as_str().to_string(),
            matched: true,
        });
        last = found.end();
    }
    if last < text.len() || segments.is_empty() {
        segments.push(Segment {
            text: text[last..].to_string(),
            matched: false,
        });
    }
    segments
}

/// What one list entry shows
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightView {
    pub id: String,
    pub preview: Vec<Segment>,
    pub domain: String,
    pub source: String,
    pub date: String,
    pub is_new: bool,
}

impl HighlightView {
    pub fn new(highlight: &HighlightRecord, today: NaiveDate, search: &str) -> HighlightView {
        HighlightView {
            id: highlight.id.clone(),
            preview: mark_matches(&truncate(&highlight.text, PREVIEW_CHARS), search),
            domain: display_domain(&highlight.source),
            source: highlight.source.clone(),
            date: highlight.display_date(),
            is_new: highlight.is_on_day(today),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFormat {
    TextOnly,
    WithSource,
    Markdown,
}

impl CopyFormat {
    pub const ALL: [CopyFormat; 3] = [CopyFormat::TextOnly, CopyFormat::WithSource, CopyFormat::Markdown];

    pub fn label(self) -> &'static str {
        match self {
            CopyFormat::TextOnly => "Copy Text Only",
            CopyFormat::WithSource => "Copy with Source",
            CopyFormat::Markdown => "Copy as Markdown",
        }
    }

    pub fn render(self, highlight: &HighlightRecord) -> String {
        match self {
            CopyFormat::TextOnly => highlight.text.clone(),
            CopyFormat::WithSource => format!("\"{}\"\n\nSource: {}", highlight.text, highlight.source),
            CopyFormat::Markdown => format!("> {}\n\n[Source]({})", highlight.text, highlight.source),
        }
    }
}

/// Body of the desktop notification raised after a capture
pub fn saved_message(highlight: &HighlightRecord) -> String {
    format!("Saved: \"{}\"", truncate(&highlight.text, NOTIFICATION_CHARS))
}
