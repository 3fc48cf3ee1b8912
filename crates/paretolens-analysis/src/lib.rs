//! Concentration analysis of per-entity values.
//!
//! Given one aggregated value per entity (revenue per client, payouts per
//! country, spend per network), this crate answers how concentrated the total
//! is:
//!
//! - **Ranking**: entities by value, largest first ([`series`])
//! - **Cumulative curve**: running share of the total down the ranking ([`cumulative`])
//! - **Deciles**: ten buckets by entity count or by value quantile ([`decile`])
//! - **Percentile curve**: the cumulative share at fixed entity percentiles ([`curve`])
//! - **Pareto fit**: shape, location and scale of a fitted Pareto distribution ([`fit`])
//!
//! plus the supporting summaries used alongside them: daily totals with a moving
//! average ([`timeline`]) and campaign unit economics ([`economics`]).
//!
//! [`analyzer::ConcentrationAnalyzer`] applies an [`config::AnalyzerConfig`] to all
//! of these and can run them together as a fault-tolerant [`report`].
//!
//! # Examples
//!
//! ```
//! use paretolens_analysis::{analyzer::ConcentrationAnalyzer, series::ValueSeries};
//!
//! let analyzer = ConcentrationAnalyzer::default();
//! let series = ValueSeries::new((1..=20).map(|i| (i64::from(i), f64::from(i * i)))).unwrap();
//!
//! let ranked = analyzer.rank(&series).unwrap();
//! let deciles = analyzer.decile_buckets(&ranked).unwrap();
//! let top = &deciles.buckets()[0];
//! assert_eq!(top.entity_count, 2);
//! assert!(top.percentage_of_total > 20.0);
//! ```

pub mod analyzer;
pub mod config;
pub mod cumulative;
pub mod curve;
pub mod decile;
pub mod economics;
pub mod error;
pub mod fit;
pub mod report;
pub mod series;
pub mod timeline;
