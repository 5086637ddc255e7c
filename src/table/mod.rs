//! Results-table extraction.
//!
//! A results table has one header row naming the source populations, one
//! row per target sample with a result cell under each population, and a
//! designated average row (labelled `Average` by default). Rows after the
//! average row are not samples.
//!
//! [`TableDocument`] models the table as role-tagged cells, which is what an
//! embedding host reading a rendered page produces. [`DelimitedTable`] reads
//! the same shape from CSV/TSV exports.

mod delimited;

pub use delimited::DelimitedTable;

use crate::error::{Error, Result};
use crate::stats::{CategoryStat, SampleSet, StatGenerator};
use tracing::debug;

/// Label of the average row when none is configured.
pub const DEFAULT_AVERAGE_LABEL: &str = "Average";

/// Anything that can produce an [`ExtractedTable`].
pub trait TableSource {
    /// Locate the table and read categories, samples and averages.
    ///
    /// # Errors
    ///
    /// [`Error::TableNotFound`], [`Error::HeaderNotFound`] or
    /// [`Error::AverageRowNotFound`] when the structure is missing.
    fn extract(&self) -> Result<ExtractedTable>;
}

/// Raw numeric content of a results table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedTable {
    /// Category names in header order.
    pub categories: Vec<String>,
    /// Samples per category; non-numeric cells are skipped.
    pub samples: SampleSet,
    /// Average row values in column order; non-numeric cells are NaN.
    pub averages: Vec<f64>,
}

impl ExtractedTable {
    /// Per-category statistics (see [`StatGenerator::generate`]).
    #[must_use]
    pub fn stats(&self) -> Vec<CategoryStat> {
        StatGenerator::generate(&self.categories, &self.samples, &self.averages)
    }
}

/// What a cell holds, as marked up by the results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    /// Header cell naming a source population.
    Source,
    /// Row label naming a target sample (or the average row).
    Target,
    /// Numeric result cell.
    Result,
    /// Anything else (corner cells, spacers).
    Other,
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Cell role.
    pub role: CellRole,
    /// Raw text content.
    pub text: String,
}

impl Cell {
    /// Create a cell.
    #[must_use]
    pub fn new(role: CellRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// A results table as rows of role-tagged cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDocument {
    rows: Vec<Vec<Cell>>,
    average_label: String,
}

impl TableDocument {
    /// Wrap rows; the first row is the header.
    #[must_use]
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self {
            rows,
            average_label: DEFAULT_AVERAGE_LABEL.to_string(),
        }
    }

    /// Use a different label to find the average row.
    #[must_use]
    pub fn with_average_label(mut self, label: impl Into<String>) -> Self {
        self.average_label = label.into();
        self
    }

    /// The rows, header first.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    fn cells_with(row: &[Cell], role: CellRole) -> impl Iterator<Item = &str> {
        row.iter()
            .filter(move |c| c.role == role)
            .map(|c| c.text.trim())
    }

    fn find_average_row(&self) -> Option<usize> {
        self.rows.iter().position(|row| {
            Self::cells_with(row, CellRole::Target)
                .next()
                .is_some_and(|label| label == self.average_label)
        })
    }
}

impl TableSource for TableDocument {
    fn extract(&self) -> Result<ExtractedTable> {
        let header = self.rows.first().ok_or(Error::TableNotFound)?;

        let categories: Vec<String> = Self::cells_with(header, CellRole::Source)
            .map(str::to_string)
            .collect();
        if categories.is_empty() {
            return Err(Error::HeaderNotFound);
        }

        let average_index = self
            .find_average_row()
            .ok_or_else(|| Error::AverageRowNotFound(self.average_label.clone()))?;

        let averages: Vec<f64> = Self::cells_with(&self.rows[average_index], CellRole::Result)
            .map(|text| parse_leading_float(text).unwrap_or(f64::NAN))
            .collect();

        let mut samples = SampleSet::new();
        for name in &categories {
            samples.insert_category(name);
        }

        let sample_rows = self.rows.get(1..average_index).unwrap_or(&[]);
        for row in sample_rows {
            for (name, text) in categories.iter().zip(Self::cells_with(row, CellRole::Result)) {
                if let Some(value) = parse_leading_float(text) {
                    samples.push(name, value);
                }
            }
        }

        debug!(
            categories = categories.len(),
            sample_rows = sample_rows.len(),
            averages = averages.len(),
            "extracted results table"
        );

        Ok(ExtractedTable {
            categories,
            samples,
            averages,
        })
    }
}

/// Parse the longest numeric prefix of `text`, ignoring leading whitespace.
///
/// `"42.5%"` gives 42.5 and `"  -3e2 x"` gives -300; text without a leading
/// number (`"n/a"`, `""`, `"."`) gives `None`.
#[must_use]
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
