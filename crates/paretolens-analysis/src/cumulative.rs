use serde::Serialize;

use crate::{
    error::DivisionError,
    series::{EntityId, RankedSeries},
};

/// Running total at one rank of a [`RankedSeries`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativePoint {
    pub rank: usize,
    pub entity: EntityId,
    /// Sum of the values at ranks `0..=rank`.
    pub cumulative_value: f64,
    /// `cumulative_value` as a percentage of the series total.
    pub cumulative_percentage: f64,
}

/// Cumulative share of the total, from the largest entity down.
///
/// For a series of non-negative values the percentages are non-decreasing and the
/// last one is 100.
///
/// # Examples
///
/// ```
/// use paretolens_analysis::{
///     cumulative::CumulativeCurve,
///     series::{RankedSeries, ValueSeries},
/// };
///
/// let series = ValueSeries::new([("A", 100.0), ("B", 300.0), ("C", 600.0)]).unwrap();
/// let ranked = RankedSeries::from_series(&series).unwrap();
/// let curve = CumulativeCurve::from_ranked(&ranked).unwrap();
/// let percentages = curve.percentages().collect::<Vec<_>>();
/// assert_eq!(percentages, [60.0, 90.0, 100.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeCurve {
    points: Vec<CumulativePoint>,
    total: f64,
}

impl CumulativeCurve {
    /// Computes running sums and percentages over `ranked`.
    ///
    /// # Errors
    ///
    /// Returns [`DivisionError`] unless the total is positive and finite, since no
    /// percentage of it is meaningful otherwise.
    pub fn from_ranked(ranked: &RankedSeries) -> Result<Self, DivisionError> {
        // Same summation order as the running sums, so the last point is exactly 100
        let total = ranked.total();
        if !total.is_finite() || total <= 0.0 {
            return Err(DivisionError::new("cumulative percentage of total"));
        }

        let mut running = 0.0;
        let points = ranked
            .iter()
            .map(|(rank, entry)| {
                running += entry.value;
                CumulativePoint {
                    rank,
                    entity: entry.entity.clone(),
                    cumulative_value: running,
                    cumulative_percentage: running / total * 100.0,
                }
            })
            .collect();
        Ok(Self { points, total })
    }

    #[must_use]
    pub fn points(&self) -> &[CumulativePoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn percentages(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.cumulative_percentage)
    }

    /// Smallest number of top-ranked entities whose combined share reaches
    /// `percentage`, e.g. how many clients make up 80% of revenue.
    ///
    /// Returns `None` if `percentage` is not finite or the curve never reaches it.
    #[must_use]
    pub fn entities_for_share(&self, percentage: f64) -> Option<usize> {
        if !percentage.is_finite() {
            return None;
        }
        // Tolerate rounding so that 100% is reached at the last point
        self.points
            .iter()
            .position(|p| p.cumulative_percentage >= percentage - 1e-9)
            .map(|rank| rank + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::ValueSeries;

    fn curve_of(values: &[f64]) -> Result<CumulativeCurve, DivisionError> {
        let series = ValueSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (i64::try_from(i).unwrap(), v)),
        )
        .unwrap();
        let ranked = RankedSeries::from_series(&series).unwrap();
        CumulativeCurve::from_ranked(&ranked)
    }

    #[test]
    fn test_running_sums() {
        let series = ValueSeries::new([("A", 100.0), ("B", 300.0), ("C", 600.0)]).unwrap();
        let ranked = RankedSeries::from_series(&series).unwrap();
        let curve = CumulativeCurve::from_ranked(&ranked).unwrap();

        let values = curve
            .points()
            .iter()
            .map(|p| p.cumulative_value)
            .collect::<Vec<_>>();
        assert_eq!(values, [600.0, 900.0, 1000.0]);
        assert_eq!(curve.percentages().collect::<Vec<_>>(), [60.0, 90.0, 100.0]);
        assert_eq!(curve.points()[0].entity, EntityId::from("C"));
        assert_eq!(curve.total(), 1000.0);
    }

    #[test]
    fn test_all_zero_is_division_error() {
        assert!(curve_of(&[0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_negative_total_is_division_error() {
        assert!(curve_of(&[1.0, -5.0]).is_err());
    }

    #[test]
    fn test_overflowing_total_is_division_error() {
        assert!(curve_of(&[f64::MAX, f64::MAX]).is_err());
    }

    #[test]
    fn test_last_point_is_exactly_hundred() {
        let values = (1..=997).map(|i| f64::from(i) * 0.1).collect::<Vec<_>>();
        let curve = curve_of(&values).unwrap();
        assert_eq!(curve.points().last().unwrap().cumulative_percentage, 100.0);
        assert!(
            curve
                .points()
                .windows(2)
                .all(|w| w[0].cumulative_percentage <= w[1].cumulative_percentage)
        );
    }

    #[test]
    fn test_entities_for_share() {
        let curve = curve_of(&[600.0, 300.0, 100.0]).unwrap();
        assert_eq!(curve.entities_for_share(50.0), Some(1));
        assert_eq!(curve.entities_for_share(80.0), Some(2));
        assert_eq!(curve.entities_for_share(100.0), Some(3));
        assert_eq!(curve.entities_for_share(f64::NAN), None);
    }
}
