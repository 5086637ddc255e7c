//! Error types for ancestry-chart operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting, aggregating or charting a table.
///
/// Every variant is recoverable: the chart controller reports these through
/// `tracing` and stays usable.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Delimited table could not be read.
    #[error("table read error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid dimensions for framebuffer or surface.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Color parsing error.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Rendering error.
    #[error("Rendering error: {0}")]
    Rendering(String),

    /// The results table is missing from the source.
    #[error("table not found")]
    TableNotFound,

    /// The header row naming the categories is missing.
    #[error("category header not found")]
    HeaderNotFound,

    /// No row carries the average label.
    #[error("average row '{0}' not found")]
    AverageRowNotFound(String),

    /// Every category was dropped by all relevance tiers.
    #[error("no displayable data: no category reached the lowest threshold {lowest}")]
    NoDisplayableData {
        /// The most permissive threshold that was tried.
        lowest: f64,
    },

    /// The chart renderer has not finished loading.
    #[error("renderer is not available yet")]
    RendererUnavailable,

    /// An operation needed a live chart instance and none exists.
    #[error("no chart instance to {0}")]
    NoChartInstance(&'static str),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),
}

impl Error {
    /// Whether the failure came from reading the source table.
    #[must_use]
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            Self::TableNotFound | Self::HeaderNotFound | Self::AverageRowNotFound(_) | Self::Csv(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions {
            width: 0,
            height: 100,
        };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_average_row_names_label() {
        let err = Error::AverageRowNotFound("Average".to_string());
        assert_eq!(err.to_string(), "average row 'Average' not found");
    }

    #[test]
    fn test_no_displayable_data_mentions_threshold() {
        let err = Error::NoDisplayableData { lowest: 0.1 };
        assert!(err.to_string().contains("0.1"));
    }

    #[test]
    fn test_extraction_classification() {
        assert!(Error::TableNotFound.is_extraction());
        assert!(Error::HeaderNotFound.is_extraction());
        assert!(Error::AverageRowNotFound(String::new()).is_extraction());
        assert!(!Error::RendererUnavailable.is_extraction());
        assert!(!Error::NoDisplayableData { lowest: 0.1 }.is_extraction());
    }
}
