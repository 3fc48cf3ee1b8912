//! Pareto fits of concentration data
//!
//! Two use cases are fitted separately:
//!
//! - [`FitTarget::RawValues`]: the per-entity values themselves (revenue,
//!   payouts, ad spend).
//! - [`FitTarget::ShareOfTotal`]: each entity's percentage of the total, which
//!   makes fits comparable across datasets of different size.
//!
//! A fit can be sampled into an overlay curve for plotting against a histogram.

use paretolens_stats::{
    histogram::Histogram,
    pareto::{ParetoDistribution, ParetoFitOptions},
};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, DivisionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitTarget {
    #[default]
    RawValues,
    ShareOfTotal,
}

impl FitTarget {
    /// Transforms `values` into the sample this target fits.
    ///
    /// # Errors
    ///
    /// Returns [`DivisionError`] for [`FitTarget::ShareOfTotal`] when the total is
    /// zero, negative or overflows.
    pub fn prepare(self, values: &[f64]) -> Result<Vec<f64>, DivisionError> {
        match self {
            Self::RawValues => Ok(values.to_vec()),
            Self::ShareOfTotal => share_of_total(values),
        }
    }
}

/// How overlay densities are scaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayScale {
    /// The probability density as is, for density-normalized histograms.
    Density,
    /// The density times `sample_count * bin_width`, matching a count histogram.
    Frequency { sample_count: usize, bin_width: f64 },
}

impl OverlayScale {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::Density => 1.0,
            Self::Frequency {
                sample_count,
                bin_width,
            } => sample_count as f64 * bin_width,
        }
    }
}

/// A fitted Pareto distribution and the sample it came from.
///
/// # Examples
///
/// ```
/// use paretolens_analysis::fit::{FitTarget, ParetoFit};
///
/// let values = [1.0, 1.2, 1.5, 2.0, 3.1, 4.4, 8.0, 19.0, 55.0, 240.0];
/// if let Ok(fit) = ParetoFit::fit(&values, FitTarget::RawValues, 5) {
///     assert_eq!(fit.sample_count(), 10);
///     assert!(fit.shape() > 0.0);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParetoFit {
    #[serde(flatten)]
    distribution: ParetoDistribution,
    target: FitTarget,
    sample_count: usize,
}

impl ParetoFit {
    /// Fits `values` for `target`, requiring at least `min_samples` values.
    ///
    /// # Errors
    ///
    /// * [`AnalysisError::Validation`] - a value is zero, negative or not finite
    /// * [`AnalysisError::Division`] - the share-of-total transform has a zero total
    /// * [`AnalysisError::Fit`] - too few values, zero spread, no interior likelihood
    ///   maximum, or no convergence
    pub fn fit(values: &[f64], target: FitTarget, min_samples: usize) -> Result<Self, AnalysisError> {
        let sample = target.prepare(values)?;
        let options = ParetoFitOptions {
            min_samples,
            ..ParetoFitOptions::default()
        };
        let distribution = ParetoDistribution::fit(&sample, &options)?;
        Ok(Self {
            distribution,
            target,
            sample_count: sample.len(),
        })
    }

    /// Relabels a fit whose sample was transformed before fitting.
    pub(crate) fn with_target(self, target: FitTarget) -> Self {
        Self { target, ..self }
    }

    #[must_use]
    pub fn distribution(&self) -> &ParetoDistribution {
        &self.distribution
    }

    #[must_use]
    pub fn shape(&self) -> f64 {
        self.distribution.shape()
    }

    #[must_use]
    pub fn loc(&self) -> f64 {
        self.distribution.loc()
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.distribution.scale()
    }

    #[must_use]
    pub fn target(&self) -> FitTarget {
        self.target
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    #[must_use]
    pub fn pdf(&self, x: f64) -> f64 {
        self.distribution.pdf(x)
    }

    /// Samples the scaled density at each of `xs`.
    #[must_use]
    pub fn overlay(&self, xs: &[f64], scale: OverlayScale) -> ParetoOverlay {
        let factor = scale.factor();
        let points = xs
            .iter()
            .map(|&x| OverlayPoint {
                x,
                y: self.pdf(x) * factor,
            })
            .collect();
        ParetoOverlay { scale, points }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParetoOverlay {
    pub scale: OverlayScale,
    pub points: Vec<OverlayPoint>,
}

/// A frequency histogram of the fitted sample with the matching fit curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramOverlay {
    pub histogram: Histogram,
    pub fit: Option<ParetoFit>,
    /// `None` when the fit failed.
    pub overlay: Option<ParetoOverlay>,
}

impl HistogramOverlay {
    /// Builds the histogram of `sample` and, when `fit` is present, its density
    /// scaled to counts at `overlay_points` evenly spaced points over the data range.
    #[must_use]
    pub fn new(
        sample: &[f64],
        num_bins: usize,
        overlay_points: usize,
        fit: Option<ParetoFit>,
    ) -> Self {
        let histogram = Histogram::new(sample.iter().copied(), num_bins);
        let overlay = fit.map(|fit| {
            let (min, max) = sample
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            let xs = linspace(min, max, overlay_points);
            fit.overlay(
                &xs,
                OverlayScale::Frequency {
                    sample_count: sample.len(),
                    bin_width: histogram.bin_width,
                },
            )
        });
        Self {
            histogram,
            fit,
            overlay,
        }
    }
}

/// Fits the raw values with a minimum sample count of `min_samples`.
///
/// # Errors
///
/// See [`ParetoFit::fit`].
pub fn fit_pareto(values: &[f64], min_samples: usize) -> Result<ParetoFit, AnalysisError> {
    ParetoFit::fit(values, FitTarget::RawValues, min_samples)
}

/// Each value as a percentage of the sum of `values`.
///
/// # Errors
///
/// Returns [`DivisionError`] if the sum is zero, negative or overflows.
pub fn share_of_total(values: &[f64]) -> Result<Vec<f64>, DivisionError> {
    let total = values.iter().sum::<f64>();
    if !total.is_finite() || total <= 0.0 {
        return Err(DivisionError::new("share of total"));
    }
    Ok(values.iter().map(|v| v / total * 100.0).collect())
}

/// `points` evenly spaced values from `start` to `end` inclusive.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => vec![],
        1 => vec![start],
        _ => {
            let last = (points - 1) as f64;
            (0..points)
                .map(|i| {
                    if i == points - 1 {
                        end
                    } else {
                        start + (end - start) * (i as f64) / last
                    }
                })
                .collect()
        }
    }
}
