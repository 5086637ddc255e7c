//! Category selection for display.
//!
//! Proportion-style tables usually carry a long tail of near-zero categories
//! that would turn a pie chart into noise. Categories are therefore filtered
//! against a list of thresholds, most demanding first; the first threshold
//! that keeps anything decides the chart. With the default tiers `[1.0, 0.1]`
//! a table whose values are all small still produces a chart.

use crate::error::{Error, Result};
use crate::stats::CategoryStat;
use std::cmp::Ordering;
use std::ops::Deref;
use tracing::{debug, info};

/// Default relevance tiers, most demanding first.
pub const DEFAULT_TIERS: [f64; 2] = [1.0, 0.1];

/// Categories to chart, ordered by mean, descending.
///
/// Read-only once built; a new extraction replaces the whole dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartDataset {
    entries: Vec<CategoryStat>,
}

impl ChartDataset {
    /// Build from entries, sorting them by mean descending (stable).
    ///
    /// Entries with a mean that is NaN or not positive are dropped.
    #[must_use]
    pub fn new(mut entries: Vec<CategoryStat>) -> Self {
        entries.retain(|s| s.mean > 0.0);
        sort_by_mean_desc(&mut entries);
        Self { entries }
    }

    /// The ordered entries.
    #[must_use]
    pub fn entries(&self) -> &[CategoryStat] {
        &self.entries
    }

    /// Sum of all means; the pie's full turn.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|s| s.mean).sum()
    }
}

impl Deref for ChartDataset {
    type Target = [CategoryStat];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

fn sort_by_mean_desc(entries: &mut [CategoryStat]) {
    entries.sort_by(|a, b| b.mean.partial_cmp(&a.mean).unwrap_or(Ordering::Equal));
}

/// Two-tier (or n-tier) threshold filter with fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceFilter {
    tiers: Vec<f64>,
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_TIERS.to_vec())
    }
}

impl RelevanceFilter {
    /// Filter trying `tiers` in the given order.
    #[must_use]
    pub fn new(tiers: Vec<f64>) -> Self {
        Self { tiers }
    }

    /// The thresholds, in the order they are tried.
    #[must_use]
    pub fn tiers(&self) -> &[f64] {
        &self.tiers
    }

    /// Keep the categories with `mean >= tier` for the first tier that keeps
    /// any, sorted by mean descending with ties in input order.
    ///
    /// # Errors
    ///
    /// [`Error::NoDisplayableData`] when every tier comes back empty.
    pub fn select(&self, stats: &[CategoryStat]) -> Result<ChartDataset> {
        for (tier_index, &threshold) in self.tiers.iter().enumerate() {
            let kept: Vec<CategoryStat> = stats
                .iter()
                .filter(|s| s.mean > 0.0 && s.mean >= threshold)
                .cloned()
                .collect();

            if kept.is_empty() {
                debug!(tier = tier_index + 1, threshold, "relevance tier kept nothing");
                continue;
            }

            info!(
                tier = tier_index + 1,
                threshold,
                kept = kept.len(),
                dropped = stats.len() - kept.len(),
                "selected categories for chart"
            );
            return Ok(ChartDataset::new(kept));
        }

        let lowest = self.tiers.iter().copied().fold(f64::INFINITY, f64::min);
        Err(Error::NoDisplayableData { lowest })
    }
}
