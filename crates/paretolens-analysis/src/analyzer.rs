//! The concentration analyzer
//!
//! [`ConcentrationAnalyzer`] bundles an [`AnalyzerConfig`] with the individual
//! operations and runs them together in [`ConcentrationAnalyzer::report`].

use paretolens_stats::summary::ValueSummary;
use tracing::{debug, warn};

use crate::{
    config::AnalyzerConfig,
    cumulative::CumulativeCurve,
    curve::PercentileCurve,
    decile::{DecileBucketing, DecilePolicy},
    error::{AnalysisError, DivisionError, ValidationError},
    fit::{FitTarget, HistogramOverlay, ParetoFit},
    report::{ConcentrationReport, ReportSection},
    series::{RankedSeries, ValueSeries},
    timeline::{DailyAverage, DailySeries},
};

/// Percentiles listed in a value summary.
pub const SUMMARY_PERCENTILES: [f64; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];

/// # Examples
///
/// ```
/// use paretolens_analysis::{analyzer::ConcentrationAnalyzer, series::ValueSeries};
///
/// let analyzer = ConcentrationAnalyzer::default();
/// let series = ValueSeries::new([("A", 100.0), ("B", 300.0), ("C", 600.0)]).unwrap();
///
/// let ranked = analyzer.rank(&series).unwrap();
/// let cumulative = analyzer.cumulative_curve(&ranked).unwrap();
/// let curve = analyzer.interpolate_percentile_curve(&cumulative).unwrap();
/// assert_eq!(curve.get(100.0), Some(100.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConcentrationAnalyzer {
    config: AnalyzerConfig,
}

impl ConcentrationAnalyzer {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `config` is invalid.
    pub fn new(config: AnalyzerConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Entities by value, largest first, ties in input order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySeries`] for an empty series.
    pub fn rank(&self, series: &ValueSeries) -> Result<RankedSeries, ValidationError> {
        let ranked = RankedSeries::from_series(series)?;
        debug!(entities = ranked.len(), total = ranked.total(), "ranked series");
        Ok(ranked)
    }

    /// # Errors
    ///
    /// Returns [`DivisionError`] if the total is not positive.
    pub fn cumulative_curve(&self, ranked: &RankedSeries) -> Result<CumulativeCurve, DivisionError> {
        CumulativeCurve::from_ranked(ranked)
    }

    /// Deciles with the configured policy.
    ///
    /// # Errors
    ///
    /// Returns [`DivisionError`] if the total is not positive.
    pub fn decile_buckets(&self, ranked: &RankedSeries) -> Result<DecileBucketing, DivisionError> {
        self.decile_buckets_with(ranked, self.config.decile_policy)
    }

    /// # Errors
    ///
    /// Returns [`DivisionError`] if the total is not positive.
    pub fn decile_buckets_with(
        &self,
        ranked: &RankedSeries,
        policy: DecilePolicy,
    ) -> Result<DecileBucketing, DivisionError> {
        let deciles = DecileBucketing::new(ranked, policy)?;
        debug!(
            ?policy,
            top_share = deciles.buckets()[0].percentage_of_total,
            "bucketed deciles"
        );
        Ok(deciles)
    }

    /// The highest-value bucket of `deciles` split into ten sub-deciles.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyBucket`] if the top bucket is empty, which
    /// happens with fewer than ten entities.
    pub fn top_decile(
        &self,
        ranked: &RankedSeries,
        deciles: &DecileBucketing,
    ) -> Result<DecileBucketing, ValidationError> {
        deciles.drill_down(ranked, 0)
    }

    /// Percentile curve at the configured checkpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CurveTooShort`] for curves of fewer than 2 points.
    pub fn interpolate_percentile_curve(
        &self,
        curve: &CumulativeCurve,
    ) -> Result<PercentileCurve, ValidationError> {
        self.interpolate_percentile_curve_at(curve, &self.config.checkpoints)
    }

    /// # Errors
    ///
    /// Returns a [`ValidationError`] for invalid checkpoints or a curve of fewer
    /// than 2 points.
    pub fn interpolate_percentile_curve_at(
        &self,
        curve: &CumulativeCurve,
        checkpoints: &[f64],
    ) -> Result<PercentileCurve, ValidationError> {
        PercentileCurve::from_cumulative(curve, checkpoints)
    }

    /// Fits raw values.
    ///
    /// # Errors
    ///
    /// See [`ParetoFit::fit`].
    pub fn fit_pareto(&self, values: &[f64]) -> Result<ParetoFit, AnalysisError> {
        self.fit(values, FitTarget::RawValues)
    }

    /// Fits the values of `ranked` for `target`.
    ///
    /// # Errors
    ///
    /// See [`ParetoFit::fit`].
    pub fn fit_series(
        &self,
        ranked: &RankedSeries,
        target: FitTarget,
    ) -> Result<ParetoFit, AnalysisError> {
        let values = ranked.values().collect::<Vec<_>>();
        self.fit(&values, target)
    }

    fn fit(&self, values: &[f64], target: FitTarget) -> Result<ParetoFit, AnalysisError> {
        let fit = ParetoFit::fit(values, target, self.config.min_fit_samples)?;
        debug!(
            ?target,
            shape = fit.shape(),
            loc = fit.loc(),
            scale = fit.scale(),
            "fitted Pareto distribution"
        );
        Ok(fit)
    }

    /// Histogram of the configured fit target with the fitted curve on top.
    ///
    /// A failed fit only drops the curve.
    ///
    /// # Errors
    ///
    /// Returns [`DivisionError`] if the share-of-total target has no positive total.
    pub fn histogram_overlay(&self, values: &[f64]) -> Result<HistogramOverlay, DivisionError> {
        let (overlay, _) = self.histogram_and_fit(values)?;
        Ok(overlay)
    }

    fn histogram_and_fit(
        &self,
        values: &[f64],
    ) -> Result<(HistogramOverlay, Option<AnalysisError>), DivisionError> {
        let target = self.config.fit_target;
        let sample = target.prepare(values)?;
        let (fit, fit_error) = match self.fit(&sample, FitTarget::RawValues) {
            Ok(fit) => (Some(fit), None),
            Err(error) => {
                warn!(%error, ?target, "skipping Pareto overlay");
                (None, Some(error))
            }
        };
        // The sample is already transformed; report the fit under the caller's target
        let fit = fit.map(|fit| fit.with_target(target));
        let overlay = HistogramOverlay::new(
            &sample,
            self.config.histogram_bins,
            self.config.overlay_points,
            fit,
        );
        Ok((overlay, fit_error))
    }

    /// Totals, central tendency, dispersion, percentiles and a histogram of `values`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySeries`] if `values` is empty.
    pub fn summarize(&self, values: &[f64]) -> Result<ValueSummary, ValidationError> {
        ValueSummary::new(
            values.iter().copied(),
            &SUMMARY_PERCENTILES,
            self.config.histogram_bins,
        )
        .ok_or(ValidationError::EmptySeries)
    }

    /// Moving average over the configured window.
    ///
    /// # Errors
    ///
    /// Cannot fail with a validated config; see [`DailySeries::moving_average`].
    pub fn daily_moving_average(
        &self,
        daily: &DailySeries,
    ) -> Result<Vec<DailyAverage>, ValidationError> {
        daily.moving_average(self.config.moving_average_window)
    }

    /// Runs every section on `series`. Failures are recorded per section and do
    /// not stop unrelated sections.
    ///
    /// # Examples
    ///
    /// ```
    /// use paretolens_analysis::{analyzer::ConcentrationAnalyzer, series::ValueSeries};
    ///
    /// let analyzer = ConcentrationAnalyzer::default();
    /// let series = ValueSeries::new([("A", 100.0), ("B", 300.0), ("C", 600.0)]).unwrap();
    /// let report = analyzer.report(&series);
    ///
    /// assert!(report.cumulative.is_some());
    /// assert!(report.deciles.is_some());
    /// // Three entities leave the top decile empty and are too few to fit
    /// assert!(report.top_decile.is_none());
    /// assert!(!report.is_complete());
    /// ```
    #[must_use]
    pub fn report(&self, series: &ValueSeries) -> ConcentrationReport {
        let _span = tracing::debug_span!("report", entities = series.len()).entered();
        let mut report = ConcentrationReport::default();

        let values = series.values().collect::<Vec<_>>();
        report.summary = report.record(ReportSection::Summary, self.summarize(&values));

        let Some(ranked) = report.record(ReportSection::Ranking, self.rank(series)) else {
            return report;
        };

        report.cumulative = report.record(ReportSection::Cumulative, self.cumulative_curve(&ranked));
        if let Some(cumulative) = &report.cumulative {
            let curve = self.interpolate_percentile_curve(cumulative);
            report.percentile_curve = report.record(ReportSection::PercentileCurve, curve);
        }

        report.deciles = report.record(ReportSection::Deciles, self.decile_buckets(&ranked));
        if let Some(deciles) = &report.deciles {
            let top = self.top_decile(&ranked, deciles);
            report.top_decile = report.record(ReportSection::TopDecile, top);
        }

        let ranked_values = ranked.values().collect::<Vec<_>>();
        if let Some((overlay, fit_error)) =
            report.record(ReportSection::Histogram, self.histogram_and_fit(&ranked_values))
        {
            if let Some(error) = fit_error {
                report.record::<(), _>(ReportSection::ParetoFit, Err(error));
            }
            report.histogram = Some(overlay);
        }

        report.ranked = Some(ranked);
        debug!(failures = report.failures.len(), "report finished");
        report
    }
}
