/// Error type shared by the capture, store and export paths
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("Selection is empty")]
    EmptySelection,

    #[error("Cannot capture on restricted page: {0}")]
    RestrictedPage(String),

    #[error("Invalid JSON format!")]
    InvalidImport,

    #[error("Error reading JSON: {0}")]
    Parse(String),

    #[error("PDF library is still loading. Please wait a moment and try again.")]
    PdfNotReady,

    #[error("No highlights to export!")]
    NothingToExport,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HighlightError>;
