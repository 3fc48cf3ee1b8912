use paretolens_stats::percentiles::interpolate;
use serde::Serialize;

use crate::{cumulative::CumulativeCurve, error::ValidationError};

/// Cumulative share of the total at one entity percentile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Percentage of entities, top ranked first, in `[0, 100]`.
    pub checkpoint: f64,
    /// Percentage of the total those entities account for.
    pub cumulative_percentage: f64,
}

/// A cumulative curve resampled at fixed entity percentiles (a Lorenz/Pareto curve).
///
/// The entity at rank `i` of `n` sits at percentile `(i + 1) / n * 100`, and the
/// curve starts at the origin, so it reads 0 at checkpoint 0 and 100 at checkpoint
/// 100 regardless of `n`. Between those positions the cumulative percentage is
/// interpolated linearly.
///
/// # Examples
///
/// ```
/// use paretolens_analysis::{
///     cumulative::CumulativeCurve,
///     curve::PercentileCurve,
///     series::{RankedSeries, ValueSeries},
/// };
///
/// let series = ValueSeries::new([("A", 100.0), ("B", 300.0), ("C", 600.0)]).unwrap();
/// let ranked = RankedSeries::from_series(&series).unwrap();
/// let cumulative = CumulativeCurve::from_ranked(&ranked).unwrap();
/// let curve = PercentileCurve::from_cumulative(&cumulative, &[0.0, 50.0, 100.0]).unwrap();
///
/// assert_eq!(curve.get(0.0), Some(0.0));
/// assert!((curve.get(50.0).unwrap() - 75.0).abs() < 1e-9);
/// assert_eq!(curve.get(100.0), Some(100.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileCurve {
    points: Vec<CurvePoint>,
}

impl PercentileCurve {
    /// Interpolates `curve` at each of `checkpoints`.
    ///
    /// # Errors
    ///
    /// * [`ValidationError::CheckpointOutOfRange`] - a checkpoint is not a finite
    ///   value in `[0, 100]`
    /// * [`ValidationError::CheckpointsNotAscending`] - checkpoints decrease somewhere
    /// * [`ValidationError::CurveTooShort`] - the curve has fewer than 2 points
    #[expect(clippy::cast_precision_loss)]
    pub fn from_cumulative(
        curve: &CumulativeCurve,
        checkpoints: &[f64],
    ) -> Result<Self, ValidationError> {
        validate_checkpoints(checkpoints)?;
        if curve.len() < 2 {
            return Err(ValidationError::CurveTooShort { count: curve.len() });
        }

        let n = curve.len() as f64;
        let positions = std::iter::once(0.0)
            .chain(curve.points().iter().map(|p| (p.rank + 1) as f64 / n * 100.0))
            .collect::<Vec<_>>();
        let percentages = std::iter::once(0.0)
            .chain(curve.percentages())
            .collect::<Vec<_>>();

        let points = checkpoints
            .iter()
            .map(|&checkpoint| CurvePoint {
                checkpoint,
                cumulative_percentage: interpolate(&positions, &percentages, checkpoint),
            })
            .collect();
        Ok(Self { points })
    }

    #[must_use]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Cumulative percentage at `checkpoint`, if it was sampled.
    #[must_use]
    pub fn get(&self, checkpoint: f64) -> Option<f64> {
        self.points
            .iter()
            .find(|p| (p.checkpoint - checkpoint).abs() < f64::EPSILON)
            .map(|p| p.cumulative_percentage)
    }
}

/// Checkpoints 0, 5, 10, ..., 100.
#[must_use]
pub fn default_checkpoints() -> Vec<f64> {
    (0..=20).map(|i| f64::from(i) * 5.0).collect()
}

/// Checks that every checkpoint is a finite percentage and that they ascend.
///
/// # Errors
///
/// Returns the first problem found as a [`ValidationError`].
pub fn validate_checkpoints(checkpoints: &[f64]) -> Result<(), ValidationError> {
    if let Some(&checkpoint) = checkpoints
        .iter()
        .find(|c| !(c.is_finite() && (0.0..=100.0).contains(*c)))
    {
        return Err(ValidationError::CheckpointOutOfRange { checkpoint });
    }
    if !checkpoints.is_sorted_by(|a, b| a <= b) {
        return Err(ValidationError::CheckpointsNotAscending);
    }
    Ok(())
}
