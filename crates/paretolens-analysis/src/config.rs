use serde::{Deserialize, Serialize};

use crate::{
    curve::{default_checkpoints, validate_checkpoints},
    decile::DecilePolicy,
    error::ValidationError,
    fit::FitTarget,
};

/// Tunable defaults of a [`ConcentrationAnalyzer`](crate::analyzer::ConcentrationAnalyzer).
///
/// Every field has a default, so a partial JSON document is a valid config:
///
/// ```
/// use paretolens_analysis::{config::AnalyzerConfig, decile::DecilePolicy};
///
/// let config: AnalyzerConfig =
///     serde_json::from_str(r#"{ "decile_policy": "value_quantile" }"#).unwrap();
/// assert_eq!(config.decile_policy, DecilePolicy::ValueQuantile);
/// assert_eq!(config.histogram_bins, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Entity percentiles at which the percentile curve is sampled.
    pub checkpoints: Vec<f64>,
    pub decile_policy: DecilePolicy,
    pub histogram_bins: usize,
    /// Number of points in a Pareto overlay curve.
    pub overlay_points: usize,
    /// Window of the daily moving average, in days.
    pub moving_average_window: usize,
    /// Fewer values than this make a Pareto fit fail.
    pub min_fit_samples: usize,
    pub fit_target: FitTarget,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            checkpoints: default_checkpoints(),
            decile_policy: DecilePolicy::RankContiguous,
            histogram_bins: 50,
            overlay_points: 100,
            moving_average_window: 30,
            min_fit_samples: 5,
            fit_target: FitTarget::RawValues,
        }
    }
}

impl AnalyzerConfig {
    /// Checks the settings that no analysis could run with.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for invalid checkpoints, zero histogram bins,
    /// a zero moving-average window, or a minimum fit sample count below 2.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_checkpoints(&self.checkpoints)?;
        at_least("histogram_bins", 1, self.histogram_bins)?;
        at_least("moving_average_window", 1, self.moving_average_window)?;
        at_least("min_fit_samples", 2, self.min_fit_samples)?;
        Ok(())
    }
}

pub(crate) fn at_least(name: &'static str, min: usize, value: usize) -> Result<(), ValidationError> {
    if value < min {
        return Err(ValidationError::ParameterTooSmall { name, min, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.checkpoints.len(), 21);
        assert_eq!(config.moving_average_window, 30);
        assert_eq!(config.min_fit_samples, 5);
        assert_eq!(config.overlay_points, 100);
    }

    #[test]
    fn test_rejects_zero_bins_and_window() {
        let config = AnalyzerConfig {
            histogram_bins: 0,
            ..AnalyzerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::ParameterTooSmall {
                name: "histogram_bins",
                min: 1,
                value: 0
            })
        );

        let config = AnalyzerConfig {
            moving_average_window: 0,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_checkpoints() {
        let config = AnalyzerConfig {
            checkpoints: vec![10.0, 5.0],
            ..AnalyzerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::CheckpointsNotAscending)
        );
    }

    #[test]
    fn test_json_round_trip_keeps_fit_target() {
        let config = AnalyzerConfig {
            fit_target: FitTarget::ShareOfTotal,
            ..AnalyzerConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""fit_target":"share_of_total""#));
        let parsed = serde_json::from_str::<AnalyzerConfig>(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
