//! Declarative pie chart description handed to a [`Renderer`](super::Renderer).

use crate::color::Rgba;
use crate::relevance::ChartDataset;
use crate::stats::CategoryStat;
use serde::{Deserialize, Serialize};

/// Chart title used when none is configured.
pub const DEFAULT_TITLE: &str = "Genetic Ancestry Distribution";

/// Kind of chart. Only pies are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Pie chart, slices clockwise from 12 o'clock.
    #[default]
    Pie,
}

/// Where the legend sits relative to the pie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    /// Above the pie, below the title.
    Top,
    /// Right of the pie.
    #[default]
    Right,
    /// Below the pie.
    Bottom,
    /// Left of the pie.
    Left,
}

/// Visual settings shared by every slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    /// Slice border color.
    pub border_color: Rgba,
    /// Slice border width in pixels.
    pub border_width: f32,
    /// Title and legend text color.
    pub text_color: Rgba,
    /// Surface background; fully transparent leaves the surface clear.
    pub background: Rgba,
    /// Legend placement.
    pub legend_position: LegendPosition,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            border_color: Rgba::WHITE,
            border_width: 2.0,
            text_color: Rgba::WHITE,
            background: Rgba::TRANSPARENT,
            legend_position: LegendPosition::Right,
        }
    }
}

/// Everything needed to draw one pie.
///
/// `labels`, `values`, `colors` and `tooltips` are parallel: index `i`
/// describes the i-th slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSpec {
    /// Chart kind.
    pub kind: ChartKind,
    /// Legend label per slice.
    pub labels: Vec<String>,
    /// Slice magnitudes (category means).
    pub values: Vec<f64>,
    /// Slice fill colors.
    pub colors: Vec<Rgba>,
    /// Chart title.
    pub title: String,
    /// Tooltip lines per slice.
    pub tooltips: Vec<[String; 2]>,
    /// Border, text and legend settings.
    pub style: ChartStyle,
}

impl PieSpec {
    /// Describe `dataset` with one color per entry.
    ///
    /// `colors` must hold at least `dataset.len()` entries; extras are ignored.
    #[must_use]
    pub fn from_dataset(dataset: &ChartDataset, colors: &[Rgba], title: &str, style: ChartStyle) -> Self {
        let n = dataset.len().min(colors.len());
        let entries = &dataset[..n];

        Self {
            kind: ChartKind::Pie,
            labels: entries.iter().map(slice_label).collect(),
            values: entries.iter().map(|s| s.mean).collect(),
            colors: colors[..n].to_vec(),
            title: title.to_string(),
            tooltips: entries.iter().map(tooltip_lines).collect(),
            style,
        }
    }

    /// Number of slices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of slice values.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Legend label: `"Irish (42.5% ± 3.5)"`.
#[must_use]
pub fn slice_label(stat: &CategoryStat) -> String {
    format!("{} ({:.1}% ± {:.1})", stat.name, stat.mean, stat.std_dev)
}

/// Tooltip body: name with mean, then the spread.
#[must_use]
pub fn tooltip_lines(stat: &CategoryStat) -> [String; 2] {
    [
        format!("{}: {:.2}%", stat.name, stat.mean),
        format!("Std Dev: ± {:.2}%", stat.std_dev),
    ]
}
