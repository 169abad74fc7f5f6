/// User settings kept in chrome.storage.sync
use serde::{Deserialize, Serialize};

/// Seconds between store polls while the popup is open
pub const DEFAULT_REFRESH_INTERVAL: u32 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Pdf];

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
            ExportFormat::Pdf => "PDF",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn from_key(key: &str) -> Option<ExportFormat> {
        ExportFormat::ALL.into_iter().find(|f| f.key() == key)
    }

    /// All formats with the preferred one first
    pub fn ordered(preferred: ExportFormat) -> Vec<ExportFormat> {
        std::iter::once(preferred)
            .chain(ExportFormat::ALL.into_iter().filter(|f| *f != preferred))
            .collect()
    }
}

/// Keys stored: `darkMode`, `refreshInterval`, `exportFormat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub dark_mode: bool,
    /// Seconds; 0 disables polling
    pub refresh_interval: u32,
    pub export_format: ExportFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dark_mode: false,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            export_format: ExportFormat::Json,
        }
    }
}

impl Settings {
    /// Poll period in milliseconds, or None when polling is off
    pub fn refresh_millis(&self) -> Option<i32> {
        match self.refresh_interval {
            0 => None,
            secs => Some(i32::try_from(secs.saturating_mul(1000)).unwrap_or(i32::MAX)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_take_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.refresh_interval, 3);
    }

    #[test]
    fn test_partial_settings() {
        let settings: Settings = serde_json::from_str(r#"{"darkMode":true,"exportFormat":"csv"}"#).unwrap();

        assert!(settings.dark_mode);
        assert_eq!(settings.export_format, ExportFormat::Csv);
        assert_eq!(settings.refresh_interval, DEFAULT_REFRESH_INTERVAL);
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(Settings::default()).unwrap();

        assert_eq!(json["darkMode"], false);
        assert_eq!(json["refreshInterval"], 3);
        assert_eq!(json["exportFormat"], "json");
    }

    #[test]
    fn test_refresh_millis() {
        let mut settings = Settings::default();
        assert_eq!(settings.refresh_millis(), Some(3000));

        settings.refresh_interval = 0;
        assert_eq!(settings.refresh_millis(), None);

        settings.refresh_interval = u32::MAX;
        assert_eq!(settings.refresh_millis(), Some(i32::MAX));
    }

    #[test]
    fn test_ordered_formats() {
        assert_eq!(
            ExportFormat::ordered(ExportFormat::Pdf),
            vec![ExportFormat::Pdf, ExportFormat::Json, ExportFormat::Csv]
        );
        assert_eq!(ExportFormat::from_key("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_key("xml"), None);
    }
}
