//! Statistical building blocks for concentration analysis.
//!
//! This crate provides the numeric tools the analysis layer is built from:
//!
//! - **Descriptive statistics**: total, mean, median, mode, variance, etc.
//! - **Percentiles**: linearly interpolated percentile tables and piecewise-linear interpolation
//! - **Histogram generation**: equal-width frequency distributions
//! - **Value summaries**: descriptive statistics, percentiles and a histogram together
//! - **Rolling statistics**: trailing moving averages
//! - **Pareto distribution**: density, CDF and maximum-likelihood fitting
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and interpolation
//! - [`histogram`]: Histogram construction for visualizing data distributions
//! - [`summary`]: One-sort summaries combining the measures above
//! - [`rolling`]: Moving averages over ordered observations
//! - [`pareto`]: The shifted Pareto distribution and its MLE fit
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use paretolens_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Computing percentiles
//!
//! ```
//! use paretolens_stats::percentiles::PercentileTable;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let table = PercentileTable::new(&values, &[25.0, 50.0, 75.0]);
//! assert_eq!(table.get(50.0), Some(3.0));
//! ```
//!
//! ## Fitting a Pareto distribution
//!
//! ```
//! use paretolens_stats::pareto::{ParetoDistribution, ParetoFitOptions};
//!
//! let values = [1.0, 1.2, 1.5, 2.0, 3.1, 4.4, 8.0, 19.0, 55.0, 240.0];
//! if let Ok(fit) = ParetoDistribution::fit(&values, &ParetoFitOptions::default()) {
//!     assert!(fit.shape() > 0.0);
//!     assert_eq!(fit.pdf(fit.support_min() - 1.0), 0.0);
//! }
//! ```

pub mod descriptive;
pub mod histogram;
pub mod pareto;
pub mod percentiles;
pub mod rolling;
pub mod summary;
