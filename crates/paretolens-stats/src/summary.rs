use serde::Serialize;

use crate::{descriptive::DescriptiveStats, histogram::Histogram, percentiles::PercentileTable};

/// Everything reported about one numeric column: descriptive statistics, a
/// percentile table and an equal-width histogram, all computed from one sort.
///
/// # Examples
///
/// ```
/// use paretolens_stats::summary::ValueSummary;
///
/// let spend = [10.0, 80.0, 20.0, 40.0, 10.0, 40.0, 10.0, 30.0];
/// let summary = ValueSummary::new(spend, &[50.0, 90.0], 7).unwrap();
///
/// assert_eq!(summary.stats.total, 240.0);
/// assert_eq!(summary.stats.mode, 10.0);
/// assert_eq!(summary.percentiles.get(50.0), Some(25.0));
/// assert_eq!(summary.histogram.bins.len(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueSummary {
    pub stats: DescriptiveStats,
    pub percentiles: PercentileTable,
    pub histogram: Histogram,
}

impl ValueSummary {
    /// Summarizes `values`, or returns `None` if there are none.
    #[must_use]
    pub fn new<I>(values: I, percentiles: &[f64], num_bins: usize) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentiles, num_bins)
    }

    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentiles: &[f64], num_bins: usize) -> Option<Self> {
        Some(Self {
            stats: DescriptiveStats::from_sorted(sorted_values)?,
            percentiles: PercentileTable::from_sorted(sorted_values, percentiles),
            histogram: Histogram::from_sorted(sorted_values, num_bins),
        })
    }
}
