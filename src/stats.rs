//! Per-category statistics.
//!
//! Each header category is paired with the reported average sitting at the
//! same position in the average row, and its spread is measured over the
//! sample rows above it.
//!
//! Pairing is positional: the i-th average belongs to the i-th header
//! category. When the two sequences differ in length only the common prefix
//! is paired, so a trailing empty cell never shifts later categories, but
//! callers must not assume every category gets a statistic.

use std::collections::HashMap;
use tracing::debug;

/// Samples per category name. Built once per extraction.
///
/// A header that repeats a name shares one sample list between both columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    samples: HashMap<String, Vec<f64>>,
}

impl SampleSet {
    /// Create an empty sample set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category with no samples yet.
    pub fn insert_category(&mut self, name: &str) {
        self.samples.entry(name.to_string()).or_default();
    }

    /// Append one sample to a category, registering it if needed.
    pub fn push(&mut self, name: &str, value: f64) {
        self.samples.entry(name.to_string()).or_default().push(value);
    }

    /// Samples recorded for a category (empty if unknown).
    #[must_use]
    pub fn get(&self, name: &str) -> &[f64] {
        self.samples.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no category is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<f64>)> for SampleSet {
    fn from_iter<I: IntoIterator<Item = (S, Vec<f64>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, values) in iter {
            set.samples.entry(name.into()).or_default().extend(values);
        }
        set
    }
}

/// Mean and population standard deviation of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStat {
    /// Category (population) name.
    pub name: String,
    /// Reported average, always `> 0`.
    pub mean: f64,
    /// Population standard deviation of the samples, `0.0` without samples.
    pub std_dev: f64,
}

impl CategoryStat {
    /// Create a statistic.
    #[must_use]
    pub fn new(name: impl Into<String>, mean: f64, std_dev: f64) -> Self {
        Self {
            name: name.into(),
            mean,
            std_dev,
        }
    }
}

/// Arithmetic mean, `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by N), `None` for an empty slice.
#[must_use]
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Builds [`CategoryStat`]s from header categories, samples and averages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatGenerator;

impl StatGenerator {
    /// Pair categories with averages positionally and compute their spread.
    ///
    /// Output keeps header order. Averages that are NaN, zero or negative
    /// drop their category even if it has samples. A category whose samples
    /// are empty gets `std_dev = 0.0`. A name repeated in the header keeps
    /// its first slot but takes the values of its last valid pairing.
    #[must_use]
    pub fn generate(categories: &[String], samples: &SampleSet, averages: &[f64]) -> Vec<CategoryStat> {
        let paired = categories.len().min(averages.len());
        if paired < categories.len() || paired < averages.len() {
            debug!(
                categories = categories.len(),
                averages = averages.len(),
                paired,
                "category and average counts differ, pairing common prefix"
            );
        }

        let mut stats: Vec<CategoryStat> = Vec::with_capacity(paired);
        for (name, &average) in categories.iter().zip(averages) {
            if average.is_nan() || average <= 0.0 {
                debug!(category = %name, average, "excluded: average is not a positive number");
                continue;
            }

            let std_dev = population_std_dev(samples.get(name)).unwrap_or(0.0);
            let stat = CategoryStat::new(name.as_str(), average, std_dev);

            match stats.iter_mut().find(|s| s.name == *name) {
                Some(existing) => *existing = stat,
                None => stats.push(stat),
            }
        }
        stats
    }
}
