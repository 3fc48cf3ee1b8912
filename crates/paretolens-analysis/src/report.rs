use paretolens_stats::summary::ValueSummary;
use serde::Serialize;

use crate::{
    cumulative::CumulativeCurve,
    curve::PercentileCurve,
    decile::DecileBucketing,
    error::{AnalysisError, serialize_display},
    fit::HistogramOverlay,
    series::RankedSeries,
};

/// One independently computed part of a [`ConcentrationReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    #[display("summary")]
    Summary,
    #[display("ranking")]
    Ranking,
    #[display("cumulative curve")]
    Cumulative,
    #[display("percentile curve")]
    PercentileCurve,
    #[display("deciles")]
    Deciles,
    #[display("top decile")]
    TopDecile,
    #[display("histogram")]
    Histogram,
    #[display("Pareto fit")]
    ParetoFit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionFailure {
    pub section: ReportSection,
    #[serde(serialize_with = "serialize_display")]
    pub error: AnalysisError,
}

/// Every concentration view of one series.
///
/// A section is `None` when it failed or when a section it is derived from
/// failed. Only the failing section itself is listed in `failures`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConcentrationReport {
    pub summary: Option<ValueSummary>,
    pub ranked: Option<RankedSeries>,
    pub cumulative: Option<CumulativeCurve>,
    pub percentile_curve: Option<PercentileCurve>,
    pub deciles: Option<DecileBucketing>,
    pub top_decile: Option<DecileBucketing>,
    pub histogram: Option<HistogramOverlay>,
    pub failures: Vec<SectionFailure>,
}

impl ConcentrationReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn failure(&self, section: ReportSection) -> Option<&AnalysisError> {
        self.failures
            .iter()
            .find(|f| f.section == section)
            .map(|f| &f.error)
    }

    /// Keeps the value of a successful section, or records why it failed.
    pub(crate) fn record<T, E>(&mut self, section: ReportSection, result: Result<T, E>) -> Option<T>
    where
        E: Into<AnalysisError>,
    {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                let error = error.into();
                tracing::warn!(%section, %error, "report section failed");
                self.failures.push(SectionFailure { section, error });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DivisionError, ValidationError};

    #[test]
    fn test_record_keeps_failures() {
        let mut report = ConcentrationReport::default();
        assert!(report.is_complete());

        let ok = report.record(ReportSection::Summary, Ok::<_, ValidationError>(1));
        assert_eq!(ok, Some(1));
        let failed = report.record(
            ReportSection::Cumulative,
            Err::<(), _>(DivisionError::new("cumulative percentage of total")),
        );
        assert_eq!(failed, None);

        assert!(!report.is_complete());
        assert!(report.failure(ReportSection::Cumulative).unwrap().is_division());
        assert!(report.failure(ReportSection::Summary).is_none());
    }

    #[test]
    fn test_failure_serializes_as_message() {
        let failure = SectionFailure {
            section: ReportSection::TopDecile,
            error: ValidationError::EmptyBucket { index: 0 }.into(),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["section"], "top_decile");
        assert_eq!(json["error"], "decile bucket 0 does not exist or is empty");
    }
}
