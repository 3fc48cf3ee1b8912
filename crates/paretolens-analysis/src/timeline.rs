//! Per-day totals and their moving average
//!
//! The caller supplies the date of every record; nothing here guesses which
//! field holds it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use paretolens_stats::rolling::moving_average;
use serde::Serialize;

use crate::{config::at_least, error::ValidationError, series::EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyAverage {
    pub date: NaiveDate,
    /// `None` until a full window of days has been seen.
    pub average: Option<f64>,
}

/// Totals per calendar date, in ascending date order. Dates without records are
/// absent rather than zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DailySeries {
    days: Vec<DailyTotal>,
}

impl DailySeries {
    /// Sums `(date, value)` records per date.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonFiniteValue`] if a value or a daily sum is not
    /// finite. The date is reported as the entity.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use paretolens_analysis::timeline::DailySeries;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
    /// let spend = DailySeries::sum_by_date([(day(2), 5.0), (day(1), 1.0), (day(2), 2.5)]).unwrap();
    /// assert_eq!(spend.values().collect::<Vec<_>>(), [1.0, 7.5]);
    /// ```
    pub fn sum_by_date<I>(records: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut totals = BTreeMap::<NaiveDate, f64>::new();
        for (date, value) in records {
            check_finite(date, value)?;
            *totals.entry(date).or_default() += value;
        }
        let days = totals
            .into_iter()
            .map(|(date, value)| {
                check_finite(date, value)?;
                Ok(DailyTotal { date, value })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        Ok(Self { days })
    }

    /// Counts records per date, e.g. installs per day.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn count_by_date<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut counts = BTreeMap::<NaiveDate, u64>::new();
        for date in dates {
            *counts.entry(date).or_default() += 1;
        }
        let days = counts
            .into_iter()
            .map(|(date, count)| DailyTotal {
                date,
                value: count as f64,
            })
            .collect();
        Self { days }
    }

    #[must_use]
    pub fn days(&self) -> &[DailyTotal] {
        &self.days
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.days.iter().map(|d| d.value)
    }

    /// Trailing mean over the last `window` recorded days, aligned with [`Self::days`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParameterTooSmall`] if `window` is zero.
    pub fn moving_average(&self, window: usize) -> Result<Vec<DailyAverage>, ValidationError> {
        at_least("window", 1, window)?;
        let values = self.values().collect::<Vec<_>>();
        Ok(self
            .days
            .iter()
            .zip(moving_average(&values, window))
            .map(|(day, average)| DailyAverage {
                date: day.date,
                average,
            })
            .collect())
    }

    /// First and last recorded date.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoDates`] if the series is empty.
    pub fn temporal_scope(&self) -> Result<TemporalScope, ValidationError> {
        TemporalScope::from_dates(self.days.iter().map(|d| d.date))
    }
}

fn check_finite(date: NaiveDate, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        return Ok(());
    }
    Err(ValidationError::NonFiniteValue {
        entity: EntityId::Text(date.to_string()),
        value,
    })
}

/// The date range a dataset covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemporalScope {
    pub first: NaiveDate,
    pub last: NaiveDate,
    /// Number of calendar days from `first` to `last`, both included.
    pub days: u64,
}

impl TemporalScope {
    /// # Errors
    ///
    /// Returns [`ValidationError::NoDates`] if `dates` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use paretolens_analysis::timeline::TemporalScope;
    ///
    /// let dates = [
    ///     NaiveDate::from_ymd_opt(2024, 2, 27).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    /// ];
    /// let scope = TemporalScope::from_dates(dates).unwrap();
    /// assert_eq!(scope.days, 4);
    /// ```
    pub fn from_dates<I>(dates: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let (first, last) = dates
            .into_iter()
            .fold(None, |range, date| match range {
                None => Some((date, date)),
                Some((first, last)) => Some((date.min(first), date.max(last))),
            })
            .ok_or(ValidationError::NoDates)?;
        let days = (last - first).num_days().unsigned_abs() + 1;
        Ok(Self { first, last, days })
    }
}
