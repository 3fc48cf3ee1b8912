//! Decile bucketing of ranked series
//!
//! Both policies produce exactly [`DECILE_COUNT`] buckets, each a contiguous
//! range of ranks. Bucket 0 always holds the highest values.
//!
//! - [`DecilePolicy::RankContiguous`] splits by entity count: bucket `i` covers
//!   ranks `floor(i * n / 10)..floor((i + 1) * n / 10)`.
//! - [`DecilePolicy::ValueQuantile`] splits by value at the 10%, 20%, ..., 90%
//!   quantiles (linear interpolation, right-closed bins). Heavily tied data can
//!   produce repeated edges, which leave some buckets empty.

use std::{array, ops::Range};

use paretolens_stats::percentiles::compute_percentile;
use serde::{Deserialize, Serialize};

use crate::{
    error::{DivisionError, ValidationError},
    series::{Entry, RankedSeries},
};

pub const DECILE_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecilePolicy {
    /// Equal entity counts per bucket.
    #[default]
    RankContiguous,
    /// Equal value-quantile ranges per bucket.
    ValueQuantile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecileBucket {
    pub bucket_index: usize,
    /// Ranks of the members, relative to the whole ranked series.
    pub ranks: Range<usize>,
    pub entity_count: usize,
    pub value_sum: f64,
    /// `value_sum` as a percentage of the whole series total. Zero for empty buckets.
    pub percentage_of_total: f64,
}

impl DecileBucket {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity_count == 0
    }
}

/// Ten buckets over a ranked series, or over one bucket of it after a drill-down.
///
/// # Examples
///
/// ```
/// use paretolens_analysis::{
///     decile::{DecileBucketing, DecilePolicy},
///     series::{RankedSeries, ValueSeries},
/// };
///
/// let series = ValueSeries::new((1..=20).map(|i| (i64::from(i), f64::from(i)))).unwrap();
/// let ranked = RankedSeries::from_series(&series).unwrap();
/// let deciles = DecileBucketing::new(&ranked, DecilePolicy::RankContiguous).unwrap();
///
/// let top = &deciles.buckets()[0];
/// assert_eq!(top.entity_count, 2);
/// assert_eq!(top.value_sum, 39.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecileBucketing {
    policy: DecilePolicy,
    /// Ranks that were divided into the buckets.
    scope: Range<usize>,
    buckets: [DecileBucket; DECILE_COUNT],
    total: f64,
}

impl DecileBucketing {
    /// Buckets every entity of `ranked`.
    ///
    /// # Errors
    ///
    /// Returns [`DivisionError`] if the series total is zero, negative or overflows.
    pub fn new(ranked: &RankedSeries, policy: DecilePolicy) -> Result<Self, DivisionError> {
        let total = ranked.total();
        if !total.is_finite() || total <= 0.0 {
            return Err(DivisionError::new("decile percentage of total"));
        }
        Ok(Self::from_entries(ranked.entries(), 0, policy, total))
    }

    fn from_entries(entries: &[Entry], offset: usize, policy: DecilePolicy, total: f64) -> Self {
        let bounds = match policy {
            DecilePolicy::RankContiguous => rank_bounds(entries.len()),
            DecilePolicy::ValueQuantile => quantile_bounds(entries),
        };
        let buckets = array::from_fn(|bucket_index| {
            let local = bounds[bucket_index].clone();
            let value_sum = entries[local.clone()].iter().map(|e| e.value).sum::<f64>();
            let entity_count = local.len();
            let percentage_of_total = if entity_count == 0 {
                0.0
            } else {
                value_sum / total * 100.0
            };
            DecileBucket {
                bucket_index,
                ranks: offset + local.start..offset + local.end,
                entity_count,
                value_sum,
                percentage_of_total,
            }
        });
        Self {
            policy,
            scope: offset..offset + entries.len(),
            buckets,
            total,
        }
    }

    /// Splits the members of bucket `index` into ten sub-buckets with the same
    /// policy. Sub-bucket percentages stay relative to the overall total.
    ///
    /// `ranked` must be the series this bucketing was built from.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyBucket`] if `index` is out of range, the
    /// bucket has no members, or its ranks are not part of `ranked`.
    ///
    /// # Examples
    ///
    /// ```
    /// use paretolens_analysis::{
    ///     decile::{DecileBucketing, DecilePolicy},
    ///     series::{RankedSeries, ValueSeries},
    /// };
    ///
    /// let series = ValueSeries::new((1..=100).map(|i| (i64::from(i), f64::from(i)))).unwrap();
    /// let ranked = RankedSeries::from_series(&series).unwrap();
    /// let deciles = DecileBucketing::new(&ranked, DecilePolicy::RankContiguous).unwrap();
    /// let top = deciles.drill_down(&ranked, 0).unwrap();
    ///
    /// assert_eq!(top.buckets()[0].value_sum, 100.0);
    /// assert_eq!(top.buckets()[9].ranks, 9..10);
    /// ```
    pub fn drill_down(&self, ranked: &RankedSeries, index: usize) -> Result<Self, ValidationError> {
        let bucket = self
            .buckets
            .get(index)
            .filter(|bucket| !bucket.is_empty())
            .ok_or(ValidationError::EmptyBucket { index })?;
        let entries = ranked
            .rank_range(bucket.ranks.clone())
            .ok_or(ValidationError::EmptyBucket { index })?;
        Ok(Self::from_entries(
            entries,
            bucket.ranks.start,
            self.policy,
            self.total,
        ))
    }

    #[must_use]
    pub fn policy(&self) -> DecilePolicy {
        self.policy
    }

    #[must_use]
    pub fn scope(&self) -> Range<usize> {
        self.scope.clone()
    }

    #[must_use]
    pub fn buckets(&self) -> &[DecileBucket; DECILE_COUNT] {
        &self.buckets
    }

    /// Total of the whole series the percentages refer to.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Buckets ordered by descending contribution, ties in bucket order.
    #[must_use]
    pub fn by_value_sum(&self) -> Vec<&DecileBucket> {
        let mut ordered = self.buckets.iter().collect::<Vec<_>>();
        ordered.sort_by(|a, b| b.value_sum.total_cmp(&a.value_sum));
        ordered
    }
}

fn rank_bounds(len: usize) -> [Range<usize>; DECILE_COUNT] {
    array::from_fn(|i| i * len / DECILE_COUNT..(i + 1) * len / DECILE_COUNT)
}

#[expect(clippy::cast_precision_loss)]
fn quantile_bounds(entries: &[Entry]) -> [Range<usize>; DECILE_COUNT] {
    let ascending = entries.iter().rev().map(|e| e.value).collect::<Vec<_>>();
    let inner_edges: [f64; DECILE_COUNT - 1] = array::from_fn(|k| {
        compute_percentile(&ascending, (k + 1) as f64 * 100.0 / DECILE_COUNT as f64)
    });
    // Bins are right-closed, so a value belongs above every edge strictly below it
    let bucket_of = |value: f64| {
        let above = inner_edges.iter().filter(|&&edge| edge < value).count();
        DECILE_COUNT - 1 - above
    };
    // Ranks are in descending value order, so bucket indices never decrease with rank
    array::from_fn(|bucket| {
        let start = entries.partition_point(|e| bucket_of(e.value) < bucket);
        let end = entries.partition_point(|e| bucket_of(e.value) <= bucket);
        start..end
    })
}
