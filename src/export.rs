/// JSON/CSV export and JSON import

use crate::error::{HighlightError, Result};
use crate::highlight::HighlightRecord;
use crate::settings::ExportFormat;
use crate::storage::{decode_records, HighlightStore};
use chrono::{DateTime, Utc};

/// Entries of the export/import menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportAction {
    ExportJson,
    ExportCsv,
    ExportPdf,
    ImportJson,
}

impl ExportAction {
    pub fn label(self) -> &'static str {
        match self {
            ExportAction::ExportJson => "Export as JSON",
            ExportAction::ExportCsv => "Export as CSV",
            ExportAction::ExportPdf => "Export as PDF",
            ExportAction::ImportJson => "Import JSON",
        }
    }

    /// Menu entries with the preferred export format first, import last
    pub fn menu(preferred: ExportFormat) -> Vec<ExportAction> {
        ExportFormat::ordered(preferred)
            .into_iter()
            .map(ExportAction::from)
            .chain(std::iter::once(ExportAction::ImportJson))
            .collect()
    }
}

impl From<ExportFormat> for ExportAction {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => ExportAction::ExportJson,
            ExportFormat::Csv => ExportAction::ExportCsv,
            ExportFormat::Pdf => ExportAction::ExportPdf,
        }
    }
}

/// Idle -> MenuOpen -> (action) -> Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Idle,
    MenuOpen,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self == MenuState::MenuOpen
    }

    pub fn toggle(self) -> MenuState {
        match self {
            MenuState::Idle => MenuState::MenuOpen,
            MenuState::MenuOpen => MenuState::Idle,
        }
    }

    /// Pick an entry; the menu always collapses. PDF export is refused
    /// until the renderer has reported ready.
    pub fn select(self, action: ExportAction, pdf_ready: bool) -> (MenuState, Result<ExportAction>) {
        let chosen = match (self, action) {
            (MenuState::Idle, _) => Err(HighlightError::Platform("Export menu is closed".to_string())),
            (MenuState::MenuOpen, ExportAction::ExportPdf) if !pdf_ready => Err(HighlightError::PdfNotReady),
            (MenuState::MenuOpen, action) => Ok(action),
        };
        (MenuState::Idle, chosen)
    }
}

/// ISO timestamp with `:` and `.` replaced so it is safe in a filename
pub fn file_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-")
}

pub fn json_filename(now: DateTime<Utc>) -> String {
    format!("highlights-{}.json", file_timestamp(now))
}

pub fn csv_filename(now: DateTime<Utc>) -> String {
    format!("highlights-{}.csv", file_timestamp(now))
}

pub fn pdf_filename(now: DateTime<Utc>) -> String {
    format!("markit-highlights-{}.pdf", file_timestamp(now))
}

pub fn to_json(highlights: &[HighlightRecord]) -> Result<String> {
    if highlights.is_empty() {
        return Err(HighlightError::NothingToExport);
    }
    Ok(serde_json::to_string_pretty(highlights)?)
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn to_csv(highlights: &[HighlightRecord]) -> Result<String> {
    if highlights.is_empty() {
        return Err(HighlightError::NothingToExport);
    }

    let rows = highlights.iter().map(|h| {
        [csv_field(&h.text), csv_field(&h.source), csv_field(&h.date)].join(",")
    });

    Ok(std::iter::once("Text,Source,Date".to_string())
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Outcome of merging an import file into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Entries present in the file
    pub presented: usize,
    /// Entries actually added after dedup
    pub added: usize,
}

impl ImportSummary {
    /// Reports the number of entries in the file, not the number merged
    pub fn message(&self) -> String {
        format!("Imported {} highlights successfully!", self.presented)
    }
}

/// Parse an import file: must be a JSON array of highlight objects.
/// Array entries that are not highlight-shaped are dropped.
pub fn parse_import(contents: &str) -> Result<(usize, Vec<HighlightRecord>)> {
    let value: serde_json::Value =
        serde_json::from_str(contents).map_err(|e| HighlightError::Parse(e.to_string()))?;

    let serde_json::Value::Array(items) = value else {
        return Err(HighlightError::InvalidImport);
    };

    let presented = items.len();
    let records = decode_records(items, "import");

    Ok((presented, records))
}

/// Parse `contents` and merge it into `store`; the store is untouched on error
pub fn import_into(store: &mut HighlightStore, contents: &str) -> Result<ImportSummary> {
    let (presented, records) = parse_import(contents)?;
    let added = store.merge(records);
    Ok(ImportSummary { presented, added })
}
