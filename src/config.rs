//! Chart configuration.
//!
//! YAML file with precedence CLI > file > defaults. Every key is optional;
//! a missing key takes its default.

use crate::chart::{ChartStyle, LegendPosition, DEFAULT_EXPORT_FILENAME, DEFAULT_TITLE};
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::palette::ColorAllocator;
use crate::relevance::{RelevanceFilter, DEFAULT_TIERS};
use crate::table::DEFAULT_AVERAGE_LABEL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Surface width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Surface height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Legend placement (top, right, bottom, left).
    #[serde(default)]
    pub legend_position: LegendPosition,

    /// Relevance thresholds, tried in order.
    #[serde(default = "default_tiers")]
    pub tiers: Vec<f64>,

    /// Target label marking the average row.
    #[serde(default = "default_average_label")]
    pub average_label: String,

    /// File name for PNG downloads.
    #[serde(default = "default_export_filename")]
    pub export_filename: String,

    /// Slice border color.
    #[serde(default = "default_border_color")]
    pub border_color: Rgba,

    /// Slice border width in pixels.
    #[serde(default = "default_border_width")]
    pub border_width: f32,

    /// Surface background (`#RRGGBBAA` for translucency).
    #[serde(default = "default_background")]
    pub background: Rgba,

    /// Title and legend text color.
    #[serde(default = "default_text_color")]
    pub text_color: Rgba,

    /// Fixed seed for generated slice colors; random when absent.
    #[serde(default)]
    pub palette_seed: Option<u64>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}
fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}
fn default_tiers() -> Vec<f64> {
    DEFAULT_TIERS.to_vec()
}
fn default_average_label() -> String {
    DEFAULT_AVERAGE_LABEL.to_string()
}
fn default_export_filename() -> String {
    DEFAULT_EXPORT_FILENAME.to_string()
}
fn default_border_color() -> Rgba {
    Rgba::WHITE
}
fn default_border_width() -> f32 {
    2.0
}
fn default_background() -> Rgba {
    Rgba::TRANSPARENT
}
fn default_text_color() -> Rgba {
    Rgba::WHITE
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            legend_position: LegendPosition::default(),
            tiers: default_tiers(),
            average_label: default_average_label(),
            export_filename: default_export_filename(),
            border_color: default_border_color(),
            border_width: default_border_width(),
            background: default_background(),
            text_color: default_text_color(),
            palette_seed: None,
        }
    }
}

impl ChartConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/ancestry-chart/config.yaml`, if the platform has one.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ancestry-chart").join("config.yaml"))
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Drawing style derived from these settings.
    #[must_use]
    pub fn style(&self) -> ChartStyle {
        ChartStyle {
            border_color: self.border_color,
            border_width: self.border_width,
            text_color: self.text_color,
            background: self.background,
            legend_position: self.legend_position,
        }
    }

    /// Relevance filter using the configured tiers.
    #[must_use]
    pub fn relevance_filter(&self) -> RelevanceFilter {
        RelevanceFilter::new(self.tiers.clone())
    }

    /// Color allocator, seeded when a seed is configured.
    #[must_use]
    pub fn color_allocator(&self) -> ColorAllocator {
        self.palette_seed
            .map_or_else(ColorAllocator::from_entropy, ColorAllocator::seeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ChartConfig::new();

        assert_eq!(config.title, "Genetic Ancestry Distribution");
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.legend_position, LegendPosition::Right);
        assert_eq!(config.tiers, [1.0, 0.1]);
        assert_eq!(config.average_label, "Average");
        assert_eq!(config.export_filename, "ancestry-chart.png");
        assert_eq!(config.border_color, Rgba::WHITE);
        assert!(config.palette_seed.is_none());
    }

    #[test]
    fn test_config_parse_empty_document_is_default() {
        let config = ChartConfig::parse("{}").unwrap();
        assert_eq!(config, ChartConfig::default());
    }

    #[test]
    fn test_config_parse_full() {
        let yaml = r##"
title: My Ancestry
width: 1024
height: 768
legend_position: bottom
tiers: [5.0, 0.5]
average_label: Mean
export_filename: mine.png
border_color: "#000000"
border_width: 1.5
background: "#1E1E1E"
text_color: "#DDDDDD"
palette_seed: 42
"##;

        let config = ChartConfig::parse(yaml).unwrap();

        assert_eq!(config.title, "My Ancestry");
        assert_eq!(config.width, 1024);
        assert_eq!(config.legend_position, LegendPosition::Bottom);
        assert_eq!(config.tiers, [5.0, 0.5]);
        assert_eq!(config.average_label, "Mean");
        assert_eq!(config.border_color, Rgba::BLACK);
        assert_eq!(config.background, Rgba::rgb(0x1E, 0x1E, 0x1E));
        assert_eq!(config.palette_seed, Some(42));

        let style = config.style();
        assert_eq!(style.legend_position, LegendPosition::Bottom);
        assert!((style.border_width - 1.5).abs() < f32::EPSILON);
        assert_eq!(config.relevance_filter().tiers(), [5.0, 0.5]);
    }

    #[test]
    fn test_config_parse_error_includes_line() {
        let yaml = r"
title: x
width: 10
height: not_a_number
";

        let err = ChartConfig::parse(yaml).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains('4'), "error should include line number: {err}");
    }

    #[test]
    fn test_config_bad_color_is_rejected() {
        assert!(ChartConfig::parse("border_color: chartreuse").is_err());
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = ChartConfig::load("/nonexistent/ancestry-chart.yaml").unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));

        let config = ChartConfig::load_or_default("/nonexistent/ancestry-chart.yaml");
        assert_eq!(config, ChartConfig::default());
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "width: 320\nheight: 240\n").unwrap();

        let config = ChartConfig::load(&path).unwrap();
        assert_eq!((config.width, config.height), (320, 240));
    }

    #[test]
    fn test_seeded_allocator_is_reproducible() {
        let config = ChartConfig {
            palette_seed: Some(3),
            ..ChartConfig::default()
        };
        assert_eq!(config.color_allocator().colors(20), config.color_allocator().colors(20));
    }

    #[test]
    fn test_default_path_file_name() {
        if let Some(path) = ChartConfig::default_path() {
            assert!(path.ends_with("ancestry-chart/config.yaml"));
        }
    }
}
