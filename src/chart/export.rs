//! Chart exports and where they are delivered.

use crate::error::Result;
use crate::output::png_data_url;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name used for PNG downloads when none is configured.
pub const DEFAULT_EXPORT_FILENAME: &str = "ancestry-chart.png";

/// Encoding of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Raster image.
    Png,
    /// Vector image.
    Svg,
}

impl ExportFormat {
    /// MIME type.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

/// An encoded chart ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Suggested file name.
    pub filename: String,
    /// Encoding of `bytes`.
    pub format: ExportFormat,
    /// Encoded image.
    pub bytes: Vec<u8>,
}

impl Export {
    /// PNG export.
    #[must_use]
    pub fn png(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            format: ExportFormat::Png,
            bytes,
        }
    }

    /// SVG export.
    #[must_use]
    pub fn svg(filename: impl Into<String>, document: String) -> Self {
        Self {
            filename: filename.into(),
            format: ExportFormat::Svg,
            bytes: document.into_bytes(),
        }
    }

    /// The export as a `data:` URL, the form a page hands to a download link.
    #[must_use]
    pub fn data_url(&self) -> String {
        match self.format {
            ExportFormat::Png => png_data_url(&self.bytes),
            ExportFormat::Svg => format!("data:{};base64,{}", self.format.mime(), STANDARD.encode(&self.bytes)),
        }
    }
}

/// Receives finished exports.
pub trait DownloadSink {
    /// Deliver one export.
    ///
    /// # Errors
    ///
    /// Sink-specific, typically I/O.
    fn deliver(&mut self, export: Export) -> Result<()>;
}

/// Writes exports into a directory, one file per export.
#[derive(Debug, Clone)]
pub struct FileDownloads {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FileDownloads {
    /// Save into `dir`, creating it on first delivery.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in delivery order.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl DownloadSink for FileDownloads {
    fn deliver(&mut self, export: Export) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&export.filename);
        fs::write(&path, &export.bytes)?;
        info!(path = %path.display(), bytes = export.bytes.len(), "saved chart");
        self.written.push(path);
        Ok(())
    }
}

/// Keeps exports in memory.
impl DownloadSink for Vec<Export> {
    fn deliver(&mut self, export: Export) -> Result<()> {
        self.push(export);
        Ok(())
    }
}
