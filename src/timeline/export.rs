//! Timeline export
//!
//! Serializes a displayed timeline to CSV or JSON for the export endpoint
//! and the CLI.

use thiserror::Error;

use super::types::DisplayedTimeline;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Parse a format name (case-insensitive); `None` for anything but csv/json
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Errors raised while exporting a timeline
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output was not valid UTF-8")]
    Encoding,
}

/// Render a timeline in the requested format
pub fn export(timeline: &DisplayedTimeline, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => to_csv(timeline),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(timeline)?),
    }
}

/// One row per displayed point: `date,blockchain,cumulative`
pub fn to_csv(timeline: &DisplayedTimeline) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["date", "blockchain", "cumulative"])?;

    for row in timeline.rows() {
        writer.write_record([
            row.date,
            row.blockchain.map(|v| v.to_string()).unwrap_or_default(),
            row.cumulative.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
}
