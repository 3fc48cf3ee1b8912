use std::ops::Range;

use serde::Serialize;

/// A histogram representation of a dataset's distribution.
///
/// The histogram divides `[min, max]` of the data into bins of equal width and
/// counts the values falling into each bin. The last bin is closed on the right so
/// the maximum value is counted, as in NumPy and Matplotlib.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order of range.
    pub bins: Vec<HistogramBin>,
    /// The common width of every bin.
    pub bin_width: f64,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end,
    /// except for the last bin which also includes its end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Creates a histogram from unsorted values.
    ///
    /// # Arguments
    ///
    /// * `values` - The data points to create the histogram from. Will be sorted internally.
    /// * `num_bins` - The number of bins to create.
    ///
    /// # Examples
    ///
    /// ```
    /// # use paretolens_stats::histogram::Histogram;
    /// let values = [5.0, 2.0, 8.0, 1.0, 9.0, 3.0, 7.0, 4.0, 6.0, 10.0];
    /// let histogram = Histogram::new(values, 3);
    /// assert_eq!(histogram.bins.len(), 3);
    /// assert_eq!(histogram.bin_width, 3.0);
    /// assert_eq!(histogram.total_count(), 10);
    /// ```
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, num_bins)
    }

    /// Creates a histogram from pre-sorted values.
    ///
    /// An empty input or `num_bins == 0` produces a histogram without bins. When all
    /// values are equal the range is widened to `value ± 0.5` so the bins keep a
    /// positive width.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], num_bins: usize) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let (Some(&first), Some(&last)) = (sorted_values.first(), sorted_values.last()) else {
            return Self {
                bins: vec![],
                bin_width: 0.0,
            };
        };
        if num_bins == 0 {
            return Self {
                bins: vec![],
                bin_width: 0.0,
            };
        }

        let (lower, upper) = if last - first > 0.0 {
            (first, last)
        } else {
            (first - 0.5, last + 0.5)
        };
        let span = upper - lower;
        let bin_width = span / num_bins as f64;

        // Recompute each edge from `lower` to avoid accumulating rounding error
        let edge = |idx: usize| {
            if idx == num_bins {
                upper
            } else {
                lower + span * (idx as f64) / (num_bins as f64)
            }
        };
        let mut bins = (0..num_bins)
            .map(|idx| HistogramBin {
                range: edge(idx)..edge(idx + 1),
                count: 0,
            })
            .collect::<Vec<_>>();

        for &val in sorted_values {
            let position = ((val - lower) / bin_width).floor();
            let mut idx = if position <= 0.0 {
                0
            } else {
                (position as usize).min(num_bins - 1)
            };
            // Correct for rounding at the computed edges
            while idx > 0 && val < bins[idx].range.start {
                idx -= 1;
            }
            while idx + 1 < num_bins && val >= bins[idx].range.end {
                idx += 1;
            }
            bins[idx].count += 1;
        }

        Self { bins, bin_width }
    }

    /// Total number of values counted across all bins.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }
}
