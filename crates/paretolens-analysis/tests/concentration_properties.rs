//! Property-based tests of the ranking, cumulative and decile invariants.

use paretolens_analysis::{
    analyzer::ConcentrationAnalyzer,
    curve::default_checkpoints,
    decile::DecilePolicy,
    series::{RankedSeries, ValueSeries},
};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn series_of(values: &[f64]) -> ValueSeries {
    ValueSeries::new(
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i64::try_from(i).unwrap(), v)),
    )
    .unwrap()
}

fn values_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.001f64..1000.0, 1..300)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_rank_is_descending_permutation(values in values_strategy()) {
        let ranked = RankedSeries::from_series(&series_of(&values)).unwrap();
        let ranked_values = ranked.values().collect::<Vec<_>>();
        prop_assert!(ranked_values.windows(2).all(|w| w[0] >= w[1]));

        let mut expected = values.clone();
        expected.sort_by(|a, b| b.total_cmp(a));
        prop_assert_eq!(ranked_values, expected);
    }

    #[test]
    fn prop_rank_is_idempotent(values in values_strategy()) {
        let series = series_of(&values);
        let first = RankedSeries::from_series(&series).unwrap();
        let second = RankedSeries::from_series(&series).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_cumulative_monotone_to_hundred(values in values_strategy()) {
        let analyzer = ConcentrationAnalyzer::default();
        let ranked = analyzer.rank(&series_of(&values)).unwrap();
        let curve = analyzer.cumulative_curve(&ranked).unwrap();

        let percentages = curve.percentages().collect::<Vec<_>>();
        prop_assert!(percentages.windows(2).all(|w| w[0] <= w[1]));
        let last = percentages[percentages.len() - 1];
        prop_assert!((last - 100.0).abs() < 1e-6);
    }

    #[test]
    fn prop_deciles_cover_series(values in values_strategy()) {
        let analyzer = ConcentrationAnalyzer::default();
        let ranked = analyzer.rank(&series_of(&values)).unwrap();

        for policy in [DecilePolicy::RankContiguous, DecilePolicy::ValueQuantile] {
            let deciles = analyzer.decile_buckets_with(&ranked, policy).unwrap();
            let buckets = deciles.buckets();

            let count = buckets.iter().map(|b| b.entity_count).sum::<usize>();
            prop_assert_eq!(count, values.len());
            let sum = buckets.iter().map(|b| b.value_sum).sum::<f64>();
            prop_assert!((sum - ranked.total()).abs() < 1e-6);

            prop_assert_eq!(buckets[0].ranks.start, 0);
            prop_assert_eq!(buckets[9].ranks.end, values.len());
            for pair in buckets.windows(2) {
                prop_assert_eq!(pair[0].ranks.end, pair[1].ranks.start);
            }
        }
    }

    #[test]
    fn prop_percentile_curve_spans_zero_to_hundred(
        values in prop::collection::vec(0.001f64..1000.0, 2..300),
    ) {
        let analyzer = ConcentrationAnalyzer::default();
        let ranked = analyzer.rank(&series_of(&values)).unwrap();
        let cumulative = analyzer.cumulative_curve(&ranked).unwrap();

        let ends = analyzer
            .interpolate_percentile_curve_at(&cumulative, &[0.0, 100.0])
            .unwrap();
        prop_assert!(ends.points()[0].cumulative_percentage.abs() < 1e-9);
        prop_assert!((ends.points()[1].cumulative_percentage - 100.0).abs() < 1e-6);

        let curve = analyzer
            .interpolate_percentile_curve_at(&cumulative, &default_checkpoints())
            .unwrap();
        // A descending ranking puts the curve on or above the diagonal
        for point in curve.points() {
            prop_assert!(point.cumulative_percentage >= point.checkpoint - 1e-6);
        }
    }
}

#[test]
fn test_report_of_example_series() {
    init_tracing();
    let analyzer = ConcentrationAnalyzer::default();
    let series = ValueSeries::new([("A", 100.0), ("B", 300.0), ("C", 600.0)]).unwrap();
    let report = analyzer.report(&series);

    let ranked = report.ranked.as_ref().unwrap();
    let order = ranked
        .entries()
        .iter()
        .map(|e| e.entity.to_string())
        .collect::<Vec<_>>();
    assert_eq!(order, ["C", "B", "A"]);

    let cumulative = report.cumulative.as_ref().unwrap();
    let values = cumulative
        .points()
        .iter()
        .map(|p| p.cumulative_value)
        .collect::<Vec<_>>();
    assert_eq!(values, [600.0, 900.0, 1000.0]);
    assert_eq!(
        cumulative.percentages().collect::<Vec<_>>(),
        [60.0, 90.0, 100.0]
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["cumulative"]["total"], 1000.0);
    assert!(json["failures"].as_array().is_some_and(|f| !f.is_empty()));
}
