use serde::Serialize;

/// The value of a dataset at one percentile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileValue {
    /// Percentile in `[0, 100]`.
    pub percentile: f64,
    pub value: f64,
}

/// Values of a dataset at a list of requested percentiles, in request order.
///
/// # Examples
///
/// ```
/// use paretolens_stats::percentiles::PercentileTable;
///
/// let payouts = [12.0, 3.0, 7.0, 1.0, 30.0, 5.0, 2.0, 9.0, 4.0, 6.0];
/// let table = PercentileTable::new(&payouts, &[25.0, 50.0, 90.0]);
///
/// assert_eq!(table.get(50.0), Some(5.5));
/// assert_eq!(table.get(25.0), Some(3.25));
/// assert_eq!(table.get(75.0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PercentileTable {
    entries: Vec<PercentileValue>,
}

impl PercentileTable {
    /// Looks up every percentile in `percentiles` on ascending data.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentiles: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        let entries = percentiles
            .iter()
            .map(|&percentile| PercentileValue {
                percentile,
                value: compute_percentile(sorted_values, percentile),
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn new(values: &[f64], percentiles: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentiles)
    }

    /// Value at `percentile`, if it was requested.
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| (entry.percentile - percentile).abs() < f64::EPSILON)
            .map(|entry| entry.value)
    }

    #[must_use]
    pub fn entries(&self) -> &[PercentileValue] {
        &self.entries
    }
}

/// Computes a single percentile value from sorted data.
///
/// Uses linear interpolation between the two nearest order statistics: for `n`
/// values the k-th percentile sits at fractional index `(n - 1) * k / 100`.
/// This is the default method of NumPy and pandas, so quantile bucket edges
/// agree with the ones analysts get from `qcut`.
///
/// # Returns
///
/// The value at the specified percentile. Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use paretolens_stats::percentiles::compute_percentile;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0];
///
/// assert_eq!(compute_percentile(&values, 0.0), 1.0);
/// assert_eq!(compute_percentile(&values, 50.0), 2.5);
/// assert_eq!(compute_percentile(&values, 100.0), 4.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let last = sorted_values.len() - 1;
    let position = (last as f64 * percentile.clamp(0.0, 100.0)) / 100.0;
    let lower = (position.floor() as usize).min(last);
    let upper = (lower + 1).min(last);
    let fraction = position - lower as f64;
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * fraction
}

/// Piecewise-linear interpolation of the points `(xp[i], fp[i])` at `x`.
///
/// `xp` must be ascending. Outside `[xp[0], xp[last]]` the end values are
/// returned unchanged. Returns `f64::NAN` when `xp` is empty.
///
/// # Panics
///
/// Panics if `xp` and `fp` differ in length.
///
/// # Examples
///
/// ```
/// use paretolens_stats::percentiles::interpolate;
///
/// let xp = [0.0, 50.0, 100.0];
/// let fp = [0.0, 80.0, 100.0];
/// assert_eq!(interpolate(&xp, &fp, 25.0), 40.0);
/// assert_eq!(interpolate(&xp, &fp, 75.0), 90.0);
/// ```
#[must_use]
pub fn interpolate(xp: &[f64], fp: &[f64], x: f64) -> f64 {
    assert_eq!(xp.len(), fp.len(), "xp and fp must have the same length");
    let (Some(&first), Some(&last)) = (xp.first(), xp.last()) else {
        return f64::NAN;
    };
    if x <= first {
        return fp[0];
    }
    if x >= last {
        return fp[fp.len() - 1];
    }
    // First index whose x-coordinate is strictly above `x`; always in 1..len here.
    let hi = xp.partition_point(|&p| p <= x);
    let lo = hi - 1;
    let span = xp[hi] - xp[lo];
    if span <= 0.0 {
        return fp[hi];
    }
    fp[lo] + (fp[hi] - fp[lo]) * (x - xp[lo]) / span
}
