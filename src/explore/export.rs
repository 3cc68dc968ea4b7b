//! Export of query results as downloadable files.
//!
//! An export runs the request in table mode, so it inherits the same
//! validation and the same row cap.

use std::fmt;
use std::io;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::encoder::TableResult;
use super::error::{ExploreError, ExploreResult};
use super::orchestrator::Explorer;
use super::request::QueryRequest;
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format '{}' (expected csv or json)", other)),
        }
    }
}

/// A rendered export file.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub content_type: &'static str,
    pub file_name: String,
    pub body: String,
}

impl<S: RecordStore> Explorer<S> {
    /// Export the rows `request` selects.
    pub fn export(&self, request: &QueryRequest, format: ExportFormat) -> ExploreResult<Export> {
        let table = self.execute_table(request)?;
        let body = match format {
            ExportFormat::Csv => to_csv(&table).map_err(|err| {
                tracing::error!(source = %request.source, error = %err, "CSV export failed");
                ExploreError::ExecutionFailed
            })?,
            ExportFormat::Json => serde_json::to_string_pretty(&table.data).map_err(|err| {
                tracing::error!(source = %request.source, error = %err, "JSON export failed");
                ExploreError::ExecutionFailed
            })?,
        };

        tracing::info!(
            source = %request.source,
            format = %format,
            rows = table.data.len(),
            "exported query result"
        );

        Ok(Export {
            content_type: format.content_type(),
            file_name: format!("{}_export.{}", request.source, format.extension()),
            body,
        })
    }
}

/// CSV with a header of column ids and CRLF line endings. Fields are quoted
/// only when needed.
pub fn to_csv(table: &TableResult) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.data {
        writer.write_record(
            table
                .columns
                .iter()
                .map(|c| row.get(c).map(csv_text).unwrap_or_default()),
        )?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|err| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, err)))
}

fn csv_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
