//! Results tables exported as delimited text (CSV, TSV, semicolon).
//!
//! ```text
//! Target,Irish,British,French
//! sample-1,40.0,36.0,20.0
//! sample-2,45.0,34.0,25.0
//! Average,42.5,35.0,22.5
//! ```
//!
//! The first non-blank row is the header: its first cell is the corner label
//! and the rest name the populations. Every other row starts with a target
//! label followed by result cells.

use super::{Cell, CellRole, ExtractedTable, TableDocument, TableSource, DEFAULT_AVERAGE_LABEL};
use crate::error::Result;
use std::path::Path;
use tracing::debug;

const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b'\t', b';'];

/// A delimited-text results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedTable {
    text: String,
    delimiter: u8,
    average_label: String,
}

impl DelimitedTable {
    /// Table from text, with the delimiter guessed from the first line.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let delimiter = detect_delimiter(&text);
        Self {
            text,
            delimiter,
            average_label: DEFAULT_AVERAGE_LABEL.to_string(),
        }
    }

    /// Table read from a file. Non-UTF-8 content is read as Latin-1.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read(path)?;
        let text = String::from_utf8(content)
            .unwrap_or_else(|e| e.as_bytes().iter().map(|&b| char::from(b)).collect());
        Ok(Self::from_text(text))
    }

    /// Use an explicit delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Use a different label to find the average row.
    #[must_use]
    pub fn with_average_label(mut self, label: impl Into<String>) -> Self {
        self.average_label = label.into();
        self
    }

    /// Delimiter in use.
    #[must_use]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Parse into role-tagged rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid delimited data.
    pub fn document(&self) -> Result<TableDocument> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(self.text.as_bytes());

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            let row = if rows.is_empty() {
                header_row(&record)
            } else {
                body_row(&record)
            };
            rows.push(row);
        }

        debug!(rows = rows.len(), delimiter = %char::from(self.delimiter), "parsed delimited table");
        Ok(TableDocument::new(rows).with_average_label(self.average_label.clone()))
    }
}

impl TableSource for DelimitedTable {
    fn extract(&self) -> Result<ExtractedTable> {
        self.document()?.extract()
    }
}

fn header_row(record: &csv::StringRecord) -> Vec<Cell> {
    let mut names: Vec<&str> = record.iter().skip(1).collect();
    while names.last().is_some_and(|name| name.trim().is_empty()) {
        names.pop();
    }

    let corner = record.get(0).unwrap_or_default();
    std::iter::once(Cell::new(CellRole::Other, corner))
        .chain(names.into_iter().map(|name| Cell::new(CellRole::Source, name)))
        .collect()
}

fn body_row(record: &csv::StringRecord) -> Vec<Cell> {
    record
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let role = if i == 0 { CellRole::Target } else { CellRole::Result };
            Cell::new(role, field)
        })
        .collect()
}

/// Pick the candidate delimiter occurring most often on the first non-blank
/// line, defaulting to a comma.
#[must_use]
pub fn detect_delimiter(text: &str) -> u8 {
    let first = text.lines().find(|line| !line.trim().is_empty()).unwrap_or_default();
    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .map(|d| (d, first.bytes().filter(|&b| b == d).count()))
        .filter(|&(_, count)| count > 0)
        .max_by_key(|&(_, count)| count)
        .map_or(b',', |(d, _)| d)
}
