/// Popup application state: snapshot, active query, filtered view and reveal cursor

use crate::highlight::HighlightRecord;
use crate::query::{FilterResult, Query};
use chrono::{NaiveDate, NaiveDateTime};

/// Records revealed per "Load More"
pub const BATCH_SIZE: usize = 5;

/// Cursor into the filtered sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    shown: usize,
    batch_size: usize,
}

impl Pager {
    pub fn new(batch_size: usize) -> Pager {
        Pager { shown: 0, batch_size }
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    /// Reveal up to one more batch of `total` items; returns how many were added
    pub fn reveal(&mut self, total: usize) -> usize {
        let end = (self.shown + self.batch_size).min(total);
        let added = end.saturating_sub(self.shown);
        self.shown += added;
        added
    }

    pub fn reset(&mut self) {
        self.shown = 0;
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.shown < total
    }

    /// Pagination line, shown only when there is more than one batch
    pub fn info(&self, total: usize) -> Option<String> {
        (total > self.batch_size).then(|| format!("Showing {} of {} highlights", self.shown, total))
    }

    pub fn button_label(&self, total: usize) -> &'static str {
        if self.has_more(total) {
            "Load More"
        } else {
            "All highlights loaded"
        }
    }
}

impl Default for Pager {
    fn default() -> Self {
        Pager::new(BATCH_SIZE)
    }
}

/// Aggregate counters shown in the popup header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub today: usize,
}

impl Stats {
    pub fn compute(snapshot: &[HighlightRecord], today: NaiveDate) -> Stats {
        Stats {
            total: snapshot.len(),
            today: snapshot.iter().filter(|h| h.is_on_day(today)).count(),
        }
    }

    pub fn total_label(&self) -> String {
        let noun = if self.total == 1 { "highlight" } else { "highlights" };
        format!("{} {}", self.total, noun)
    }

    pub fn today_label(&self) -> String {
        format!("{} today", self.today)
    }
}

/// The "highlight saved" toast. Every message gets a new generation so an
/// older dismiss timer cannot hide a newer message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Toast {
    message: Option<String>,
    generation: u64,
}

impl Toast {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Show `message`; returns the generation its dismiss timer must pass back
    pub fn show(&mut self, message: String) -> u64 {
        self.generation += 1;
        self.message = Some(message);
        self.generation
    }

    /// Hide the toast if `generation` is still the one on screen
    pub fn dismiss(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.message.is_none() {
            return false;
        }
        self.message = None;
        true
    }
}

/// Everything the highlight list renders from
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PopupState {
    pub snapshot: Vec<HighlightRecord>,
    pub query: Query,
    pub result: FilterResult,
    pub pager: Pager,
    pub stats: Stats,
    pub loaded: bool,
}

impl PopupState {
    /// Swap in a freshly loaded snapshot. Returns false, leaving the state
    /// untouched, when it is identical to the one already held.
    pub fn replace_snapshot(&mut self, snapshot: Vec<HighlightRecord>, now: NaiveDateTime) -> bool {
        if self.loaded && snapshot == self.snapshot {
            return false;
        }
        self.snapshot = snapshot;
        self.loaded = true;
        self.stats = Stats::compute(&self.snapshot, now.date());
        self.refilter(now);
        true
    }

    pub fn set_query(&mut self, query: Query, now: NaiveDateTime) {
        self.query = query;
        self.refilter(now);
    }

    /// Re-run the filters and start revealing from the top again
    pub fn refilter(&mut self, now: NaiveDateTime) {
        self.result = self.query.apply(&self.snapshot, now);
        self.pager.reset();
        self.pager.reveal(self.result.filtered());
    }

    pub fn load_more(&mut self) -> usize {
        self.pager.reveal(self.result.filtered())
    }

    pub fn visible(&self) -> &[HighlightRecord] {
        &self.result.records[..self.pager.shown().min(self.result.records.len())]
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more(self.result.filtered())
    }

    /// Records the "open all links" action targets
    pub fn link_targets(&self) -> &[HighlightRecord] {
        if self.result.records.is_empty() {
            &self.snapshot
        } else {
            &self.result.records
        }
    }
}
