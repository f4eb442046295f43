mod cli;
mod html;
mod json;

pub use cli::print_table;
pub use html::print_html;
pub use json::print_json;

use crate::model::ScanRecord;
use anyhow::Result;
use chrono::{DateTime, Local};

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal format
    Table,
    /// JSON format for programmatic use
    Json,
    /// Self-contained HTML report
    Html,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!(
                "Unknown format: {}. Use 'table', 'json', or 'html'",
                s
            )),
        }
    }
}

pub fn print_record(record: &ScanRecord, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_table(record),
        OutputFormat::Json => print_json(record),
        OutputFormat::Html => print_html(record),
    }
}

/// Format a record to a string for file output
pub fn render_record(record: &ScanRecord, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(cli::render_table(record)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Html => Ok(html::generate_html_string(record)),
    }
}

/// Renders an ISO-8601 timestamp in local human-readable form.
///
/// Anything that does not parse is shown as-is.
pub(crate) fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("table").unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("html").unwrap(), OutputFormat::Html);
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_format_timestamp_parses_rfc3339() {
        let rendered = format_timestamp("2025-06-01T12:30:00+00:00");
        assert!(rendered.starts_with("2025-06-01") || rendered.starts_with("2025-06-02"));
        assert_ne!(rendered, "2025-06-01T12:30:00+00:00");
    }

    #[test]
    fn test_format_timestamp_passes_malformed_through() {
        assert_eq!(format_timestamp("yesterday-ish"), "yesterday-ish");
        assert_eq!(format_timestamp(""), "");
    }

    #[test]
    fn test_render_is_idempotent_across_formats() {
        let record: crate::model::ScanRecord = serde_json::from_str(
            r#"{
                "name": "Nightly",
                "url": "https://example.com",
                "status": "completed",
                "results": {
                    "vulnerabilities": [
                        {"type": "missing_header", "header": "X-Frame-Options", "severity": "medium"}
                    ]
                }
            }"#,
        )
        .unwrap();

        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Html] {
            let first = render_record(&record, format).unwrap();
            let second = render_record(&record, format).unwrap();
            assert_eq!(first, second);
        }
    }
}
