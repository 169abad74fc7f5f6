/// Page layout for the PDF export.
///
/// The layout is computed here as plain draw operations in millimetres on A4
/// pages; `js/bridge.js` replays them onto a jsPDF document.

use crate::domain::{display_domain, unique_sources};
use crate::highlight::HighlightRecord;
use crate::view::truncate;
use serde::Serialize;

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 20.0;
/// Space kept free above the bottom edge for the footer
pub const BOTTOM_MARGIN: f64 = 30.0;
/// Highlights listed in the table of contents
pub const TOC_ITEMS: usize = 15;

const CONTENT_WIDTH: f64 = PAGE_WIDTH - MARGIN * 2.0;
/// First line on every page after the cover
const PAGE_TOP: f64 = 30.0;
const LINE_HEIGHT: f64 = 5.0;
/// Gap, divider, source and date below a card's text
const CARD_TAIL: f64 = 40.0;
/// Frame padding below the text of a card part that continues on the next page
const CARD_SEGMENT_PAD: f64 = 6.0;
/// Fewer lines than this left on a page are moved to the next one
const MIN_SPLIT_LINES: usize = 3;
/// Wrap width for card text at 10pt in the card body
const CARD_CHARS_PER_LINE: usize = 80;
const TOC_PREVIEW_CHARS: usize = 60;
const CARD_SOURCE_CHARS: usize = 50;
const APPENDIX_LINK_CHARS: usize = 70;

const ACCENT: Rgb = Rgb(102, 126, 234);
const LINK: Rgb = Rgb(59, 130, 246);
const HEADING: Rgb = Rgb(51, 65, 85);
const MUTED: Rgb = Rgb(100, 116, 139);
const FAINT: Rgb = Rgb(150, 150, 150);
const WHITE: Rgb = Rgb(255, 255, 255);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
}

/// One drawing instruction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Rgb,
        stroke: Option<Rgb>,
        radius: f64,
    },
    Circle {
        x: f64,
        y: f64,
        r: f64,
        fill: Rgb,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Rgb,
    },
    Text {
        x: f64,
        y: f64,
        lines: Vec<String>,
        size: f64,
        bold: bool,
        color: Rgb,
        align: Align,
    },
    Link {
        x: f64,
        y: f64,
        text: String,
        url: String,
        size: f64,
        color: Rgb,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// The finished document, ready for the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub pages: Vec<Page>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Greedy word wrap to at most `width` characters per line; words longer
/// than a line are split
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn text(x: f64, y: f64, content: impl Into<String>, size: f64, bold: bool, color: Rgb) -> DrawOp {
    DrawOp::Text {
        x,
        y,
        lines: vec![content.into()],
        size,
        bold,
        color,
        align: Align::Left,
    }
}

fn centered(y: f64, content: impl Into<String>, size: f64, bold: bool, color: Rgb) -> DrawOp {
    DrawOp::Text {
        x: PAGE_WIDTH / 2.0,
        y,
        lines: vec![content.into()],
        size,
        bold,
        color,
        align: Align::Center,
    }
}

/// Page-at-a-time builder with a vertical cursor
struct Builder {
    pages: Vec<Page>,
    y: f64,
}

impl Builder {
    fn new() -> Builder {
        Builder {
            pages: vec![Page::default()],
            y: 0.0,
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn new_page(&mut self, top: f64) {
        self.pages.push(Page::default());
        self.y = top;
    }

    fn cover(&mut self, highlights: &[HighlightRecord], export_date: &str, source_count: usize) {
        self.push(DrawOp::Rect {
            x: 0.0,
            y: 0.0,
            w: PAGE_WIDTH,
            h: 80.0,
            fill: ACCENT,
            stroke: None,
            radius: 0.0,
        });
        self.push(centered(40.0, "MarkIt Highlights", 32.0, true, WHITE));
        self.push(centered(55.0, "Your Saved Web Highlights", 12.0, false, WHITE));

        self.push(DrawOp::Rect {
            x: MARGIN,
            y: 100.0,
            w: CONTENT_WIDTH,
            h: 60.0,
            fill: Rgb(248, 250, 252),
            stroke: None,
            radius: 3.0,
        });
        self.push(text(MARGIN + 10.0, 115.0, "Summary", 11.0, true, HEADING));
        self.push(text(
            MARGIN + 10.0,
            130.0,
            format!("Total Highlights: {}", highlights.len()),
            10.0,
            false,
            HEADING,
        ));
        self.push(text(MARGIN + 10.0, 140.0, format!("Export Date: {}", export_date), 10.0, false, HEADING));
        self.push(text(MARGIN + 10.0, 150.0, format!("Unique Sources: {}", source_count), 10.0, false, HEADING));

        self.push(text(MARGIN, 185.0, "Table of Contents", 16.0, true, HEADING));
        let mut y = 200.0;
        for (index, highlight) in highlights.iter().take(TOC_ITEMS).enumerate() {
            let preview = truncate(&highlight.text, TOC_PREVIEW_CHARS);
            self.push(text(MARGIN + 5.0, y, format!("{}. {}", index + 1, preview), 9.0, false, MUTED));
            y += 6.0;
        }
        if highlights.len() > TOC_ITEMS {
            self.push(text(
                MARGIN + 5.0,
                y,
                format!("... and {} more", highlights.len() - TOC_ITEMS),
                9.0,
                false,
                FAINT,
            ));
        }
    }

    /// Whole text lines that fit above the bottom margin with `reserve` mm kept below them
    fn lines_fitting(&self, reserve: f64) -> usize {
        let room = PAGE_HEIGHT - BOTTOM_MARGIN - self.y - reserve;
        if room <= 0.0 {
            0
        } else {
            (room / LINE_HEIGHT).floor() as usize
        }
    }

    /// Card frame, number badge and text block starting at the cursor
    fn card_body(&mut self, index: usize, lines: Vec<String>, frame_height: f64, badge: bool) {
        let top = self.y;
        self.push(DrawOp::Rect {
            x: MARGIN,
            y: top - 5.0,
            w: CONTENT_WIDTH,
            h: frame_height,
            fill: WHITE,
            stroke: Some(Rgb(226, 232, 240)),
            radius: 2.0,
        });
        if badge {
            self.push(DrawOp::Circle {
                x: MARGIN + 8.0,
                y: top + 2.0,
                r: 5.0,
                fill: ACCENT,
            });
            self.push(DrawOp::Text {
                x: MARGIN + 8.0,
                y: top + 3.5,
                lines: vec![(index + 1).to_string()],
                size: 9.0,
                bold: true,
                color: WHITE,
                align: Align::Center,
            });
        }
        self.push(DrawOp::Text {
            x: MARGIN + 18.0,
            y: top + 2.0,
            lines,
            size: 10.0,
            bold: false,
            color: Rgb(30, 41, 59),
            align: Align::Left,
        });
    }

    fn card(&mut self, index: usize, highlight: &HighlightRecord) {
        let mut lines = wrap_text(&format!("\"{}\"", highlight.text), CARD_CHARS_PER_LINE);
        let mut continued = false;

        // Text that cannot fit on one page is split, the tail goes with the last part
        while lines.len() > self.lines_fitting(CARD_TAIL) {
            let fits_fresh_page = lines.len() as f64 * LINE_HEIGHT + CARD_TAIL <= PAGE_HEIGHT - BOTTOM_MARGIN - PAGE_TOP;
            let take = self.lines_fitting(CARD_SEGMENT_PAD).min(lines.len() - 1);
            if (!continued && fits_fresh_page) || take < MIN_SPLIT_LINES {
                self.new_page(PAGE_TOP);
                continue;
            }

            let rest = lines.split_off(take);
            let frame_height = take as f64 * LINE_HEIGHT + CARD_SEGMENT_PAD;
            self.card_body(index, lines, frame_height, !continued);
            lines = rest;
            continued = true;
            self.new_page(PAGE_TOP);
        }

        let top = self.y;
        let text_height = lines.len() as f64 * LINE_HEIGHT;
        self.card_body(index, lines, text_height + CARD_TAIL - 8.0, !continued);

        let mut y = top + text_height + 8.0;
        self.push(DrawOp::Line {
            x1: MARGIN + 10.0,
            y1: y,
            x2: PAGE_WIDTH - MARGIN - 10.0,
            y2: y,
            color: Rgb(241, 245, 249),
        });
        y += 5.0;

        self.push(text(MARGIN + 10.0, y, "Source:", 9.0, true, ACCENT));
        self.push(DrawOp::Link {
            x: MARGIN + 30.0,
            y,
            text: truncate(&display_domain(&highlight.source), CARD_SOURCE_CHARS),
            url: highlight.source.clone(),
            size: 9.0,
            color: LINK,
        });
        y += 6.0;

        self.push(text(MARGIN + 10.0, y, "Saved:", 9.0, true, MUTED));
        self.push(text(MARGIN + 30.0, y, highlight.display_date(), 9.0, false, Rgb(148, 163, 184)));
        self.y = y + 15.0;
    }

    fn appendix(&mut self, sources: &[(String, String)]) {
        self.new_page(60.0);
        self.push(DrawOp::Rect {
            x: 0.0,
            y: 20.0,
            w: PAGE_WIDTH,
            h: 25.0,
            fill: ACCENT,
            stroke: None,
            radius: 0.0,
        });
        self.push(centered(35.0, "All Unique Sources", 18.0, true, WHITE));

        for (index, (domain, url)) in sources.iter().enumerate() {
            if self.y > PAGE_HEIGHT - BOTTOM_MARGIN {
                self.new_page(PAGE_TOP);
            }
            self.push(text(MARGIN, self.y, format!("{}.", index + 1), 9.0, true, HEADING));
            self.push(DrawOp::Link {
                x: MARGIN + 8.0,
                y: self.y,
                text: truncate(domain, APPENDIX_LINK_CHARS),
                url: url.clone(),
                size: 9.0,
                color: LINK,
            });
            self.y += 7.0;
        }
    }

    /// Page numbers on every page after the cover
    fn footers(&mut self) {
        let total = self.pages.len();
        for (index, page) in self.pages.iter_mut().enumerate().skip(1) {
            page.ops.push(centered(PAGE_HEIGHT - 10.0, format!("Page {} of {}", index + 1, total), 8.0, false, FAINT));
            page.ops.push(text(MARGIN, PAGE_HEIGHT - 10.0, "Generated by MarkIt", 8.0, false, FAINT));
        }
    }
}

/// Lay out the full export: cover, one card per highlight, sources appendix
pub fn build_document(highlights: &[HighlightRecord], export_date: &str) -> DocumentLayout {
    let sources = unique_sources(highlights.iter().map(|h| h.source.as_str()));

    let mut builder = Builder::new();
    builder.cover(highlights, export_date, sources.len());

    builder.new_page(PAGE_TOP);
    for (index, highlight) in highlights.iter().enumerate() {
        builder.card(index, highlight);
    }

    builder.appendix(&sources);
    builder.footers();

    DocumentLayout {
        page_width: PAGE_WIDTH,
        page_height: PAGE_HEIGHT,
        pages: builder.pages,
    }
}
