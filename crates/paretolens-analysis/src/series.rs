//! Value series and their ranked form
//!
//! A [`ValueSeries`] holds one aggregated value per entity (client, country,
//! install, network, ...) in the order the caller supplied. A [`RankedSeries`]
//! orders the same entries by value, largest first.
//!
//! # Invariants
//!
//! - Entity identifiers are unique within a series.
//! - Every value is finite. This is checked when the series is built, so derived
//!   series never see NaN or infinities.
//! - Ranking is stable: equal values keep their input order, so ranking the same
//!   input always produces the same output.

use std::collections::{HashMap, HashSet, hash_map::Entry as MapEntry};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Grouping key of an aggregation.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(untagged)]
pub enum EntityId {
    #[display("{_0}")]
    Int(i64),
    #[display("{_0}")]
    Text(String),
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// One entity and its aggregated value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub entity: EntityId,
    pub value: f64,
}

/// Per-entity values in caller order.
///
/// # Examples
///
/// ```
/// use paretolens_analysis::series::ValueSeries;
///
/// let series = ValueSeries::new([("A", 100.0), ("B", 300.0), ("C", 600.0)]).unwrap();
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.total(), 1000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValueSeries {
    entries: Vec<Entry>,
}

impl ValueSeries {
    /// Builds a series from `(entity, value)` pairs, one per entity.
    ///
    /// # Errors
    ///
    /// * [`ValidationError::DuplicateEntity`] - an entity occurs twice
    /// * [`ValidationError::NonFiniteValue`] - a value is NaN or infinite
    pub fn new<I, K>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<EntityId>,
    {
        let mut seen = HashSet::new();
        let mut entries = vec![];
        for (entity, value) in pairs {
            let entity = entity.into();
            check_finite(&entity, value)?;
            if !seen.insert(entity.clone()) {
                return Err(ValidationError::DuplicateEntity { entity });
            }
            entries.push(Entry { entity, value });
        }
        Ok(Self { entries })
    }

    /// Aggregates raw `(entity, value)` records by summing per entity.
    ///
    /// Entities appear in the order they are first seen, which keeps ranking
    /// ties reproducible for a given record order.
    ///
    /// # Examples
    ///
    /// ```
    /// use paretolens_analysis::series::ValueSeries;
    ///
    /// let records = [(7, 1.5), (3, 2.0), (7, 0.5)];
    /// let series = ValueSeries::sum_by_entity(records).unwrap();
    /// let values = series.values().collect::<Vec<_>>();
    /// assert_eq!(values, vec![2.0, 2.0]);
    /// ```
    pub fn sum_by_entity<I, K>(records: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<EntityId>,
    {
        let entries = group_by_entity(records)?
            .into_iter()
            .map(|(entry, _)| entry)
            .collect();
        Ok(Self { entries })
    }

    /// Aggregates raw `(entity, value)` records by averaging per entity, in
    /// first-seen order.
    ///
    /// # Examples
    ///
    /// ```
    /// use paretolens_analysis::series::ValueSeries;
    ///
    /// let records = [("US", 10.0), ("BR", 4.0), ("US", 30.0)];
    /// let series = ValueSeries::mean_by_entity(records).unwrap();
    /// let values = series.values().collect::<Vec<_>>();
    /// assert_eq!(values, vec![20.0, 4.0]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn mean_by_entity<I, K>(records: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<EntityId>,
    {
        let entries = group_by_entity(records)?
            .into_iter()
            .map(|(Entry { entity, value }, count)| Entry {
                entity,
                value: value / count as f64,
            })
            .collect();
        Ok(Self { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|entry| entry.value)
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.values().sum()
    }
}

/// Per-entity sums and record counts, in first-seen order.
fn group_by_entity<I, K>(records: I) -> Result<Vec<(Entry, usize)>, ValidationError>
where
    I: IntoIterator<Item = (K, f64)>,
    K: Into<EntityId>,
{
    let mut index = HashMap::<EntityId, usize>::new();
    let mut groups = Vec::<(Entry, usize)>::new();
    for (entity, value) in records {
        let entity = entity.into();
        check_finite(&entity, value)?;
        match index.entry(entity) {
            MapEntry::Occupied(slot) => {
                let (entry, count) = &mut groups[*slot.get()];
                entry.value += value;
                *count += 1;
            }
            MapEntry::Vacant(slot) => {
                let entry = Entry {
                    entity: slot.key().clone(),
                    value,
                };
                groups.push((entry, 1));
                slot.insert(groups.len() - 1);
            }
        }
    }
    // Sums of finite values can still overflow
    for (entry, _) in &groups {
        check_finite(&entry.entity, entry.value)?;
    }
    Ok(groups)
}

/// How many records a set of identifiers has, and how many of them are distinct.
///
/// # Examples
///
/// ```
/// use paretolens_analysis::series::IdCounts;
///
/// let counts = IdCounts::from_ids(["i-1", "i-2", "i-1", "i-3"]);
/// assert_eq!(counts.total, 4);
/// assert_eq!(counts.unique, 3);
/// assert_eq!(counts.duplicates(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IdCounts {
    pub total: usize,
    pub unique: usize,
}

impl IdCounts {
    #[must_use]
    pub fn from_ids<I, K>(ids: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<EntityId>,
    {
        let mut seen = HashSet::new();
        let mut total = 0;
        for id in ids {
            seen.insert(id.into());
            total += 1;
        }
        Self {
            total,
            unique: seen.len(),
        }
    }

    /// Records whose identifier was already seen.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.total - self.unique
    }
}

fn check_finite(entity: &EntityId, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteValue {
            entity: entity.clone(),
            value,
        })
    }
}

/// Entries sorted by value, largest first. The rank of an entry is its index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSeries {
    entries: Vec<Entry>,
}

impl RankedSeries {
    /// Ranks `series` by value descending, keeping input order among equal values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySeries`] if the series has no entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use paretolens_analysis::series::{RankedSeries, ValueSeries};
    ///
    /// let series = ValueSeries::new([("A", 100.0), ("B", 300.0), ("C", 600.0)]).unwrap();
    /// let ranked = RankedSeries::from_series(&series).unwrap();
    /// let order = ranked.entries().iter().map(|e| e.entity.to_string()).collect::<Vec<_>>();
    /// assert_eq!(order, ["C", "B", "A"]);
    /// ```
    pub fn from_series(series: &ValueSeries) -> Result<Self, ValidationError> {
        if series.is_empty() {
            return Err(ValidationError::EmptySeries);
        }
        let mut entries = series.entries.clone();
        // `sort_by` is stable, which gives the input-order tie break
        entries.sort_by(|a, b| b.value.total_cmp(&a.value));
        Ok(Self { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries with their rank.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Entry)> + '_ {
        self.entries.iter().enumerate()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|entry| entry.value)
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.values().sum()
    }

    /// Entries whose rank falls in `ranks`, or `None` if `ranks` extends past the
    /// end of the series.
    #[must_use]
    pub fn rank_range(&self, ranks: Range<usize>) -> Option<&[Entry]> {
        self.entries.get(ranks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity_order(ranked: &RankedSeries) -> Vec<String> {
        ranked
            .entries()
            .iter()
            .map(|e| e.entity.to_string())
            .collect()
    }

    #[test]
    fn test_rank_descending() {
        let series = ValueSeries::new([("A", 100.0), ("B", 300.0), ("C", 600.0)]).unwrap();
        let ranked = RankedSeries::from_series(&series).unwrap();
        assert_eq!(entity_order(&ranked), ["C", "B", "A"]);
        assert_eq!(ranked.values().collect::<Vec<_>>(), [600.0, 300.0, 100.0]);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let series =
            ValueSeries::new([("x", 5.0), ("y", 9.0), ("z", 5.0), ("w", 5.0)]).unwrap();
        let ranked = RankedSeries::from_series(&series).unwrap();
        assert_eq!(entity_order(&ranked), ["y", "x", "z", "w"]);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let series = ValueSeries::new((0..50).map(|i| (i64::from(i), f64::from(i % 7)))).unwrap();
        let first = RankedSeries::from_series(&series).unwrap();
        let second = RankedSeries::from_series(&series).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rank_empty_series() {
        let series = ValueSeries::default();
        assert_eq!(
            RankedSeries::from_series(&series),
            Err(ValidationError::EmptySeries)
        );
    }

    #[test]
    fn test_new_rejects_non_finite() {
        let err = ValueSeries::new([("a", 1.0), ("b", f64::NAN)]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NonFiniteValue { entity: EntityId::Text(ref id), .. } if id == "b"
        ));
        assert!(ValueSeries::new([(1, f64::INFINITY)]).is_err());
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let err = ValueSeries::new([(1, 1.0), (2, 2.0), (1, 3.0)]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateEntity {
                entity: EntityId::Int(1)
            }
        );
    }

    #[test]
    fn test_sum_by_entity_first_seen_order() {
        let records = [("b", 1.0), ("a", 2.0), ("b", 4.0), ("c", 0.5), ("a", 1.0)];
        let series = ValueSeries::sum_by_entity(records).unwrap();
        let pairs = series
            .entries()
            .iter()
            .map(|e| (e.entity.to_string(), e.value))
            .collect::<Vec<_>>();
        assert_eq!(
            pairs,
            [
                ("b".to_owned(), 5.0),
                ("a".to_owned(), 3.0),
                ("c".to_owned(), 0.5)
            ]
        );
    }

    #[test]
    fn test_sum_by_entity_overflow() {
        let records = [(1, f64::MAX), (1, f64::MAX)];
        assert!(matches!(
            ValueSeries::sum_by_entity(records),
            Err(ValidationError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn test_mean_by_entity() {
        let records = [(3_i64, 1.0), (8, 6.0), (3, 2.0), (3, 6.0)];
        let series = ValueSeries::mean_by_entity(records).unwrap();
        let pairs = series
            .entries()
            .iter()
            .map(|e| (e.entity.clone(), e.value))
            .collect::<Vec<_>>();
        assert_eq!(pairs, [(EntityId::Int(3), 3.0), (EntityId::Int(8), 6.0)]);

        assert!(ValueSeries::mean_by_entity([("a", f64::NAN)]).is_err());
        assert!(ValueSeries::mean_by_entity([(1_i64, f64::MAX), (1, f64::MAX)]).is_err());
    }

    #[test]
    fn test_id_counts() {
        assert_eq!(IdCounts::from_ids(Vec::<i64>::new()), IdCounts::default());
        let counts = IdCounts::from_ids([7_i64, 7, 7, 9]);
        assert_eq!(counts, IdCounts { total: 4, unique: 2 });
        assert_eq!(counts.duplicates(), 2);
    }

    #[test]
    fn test_rank_range() {
        let series = ValueSeries::new([("A", 1.0), ("B", 3.0), ("C", 2.0)]).unwrap();
        let ranked = RankedSeries::from_series(&series).unwrap();
        let middle = ranked.rank_range(1..3).unwrap();
        assert_eq!(middle[0].entity, EntityId::from("C"));
        assert_eq!(middle.len(), 2);
        assert!(ranked.rank_range(2..4).is_none());
    }

    #[test]
    fn test_entity_id_serde() {
        let ids = [EntityId::from(42), EntityId::from("client-7")];
        let json = serde_json::to_string(&ids).unwrap();
        assert_eq!(json, r#"[42,"client-7"]"#);
    }
}
