//! Pareto (Type I, shifted) distribution and its maximum-likelihood fit
//!
//! The distribution has shape `b > 0`, location `loc` and scale `s > 0`, with density
//!
//! ```text
//!              b * s^b
//! f(x) = ------------------    for x - loc >= s
//!        (x - loc)^(b + 1)
//! ```
//!
//! and zero below `loc + s`. This is the three-parameter form used by SciPy's
//! `pareto`, so fitted parameters are comparable with figures produced there.
//!
//! # Fitting
//!
//! For a trial scale `d`, the likelihood is maximized by `loc = min(x) - d` and the
//! closed-form shape `b = n / Σ ln((x_i - loc) / d)`. The remaining one-dimensional
//! problem is solved by finding the scale where the location and scale partial
//! derivatives of the log-likelihood balance:
//!
//! ```text
//! (b + 1) * Σ 1 / (x_i - loc) = n * b / d
//! ```
//!
//! Sign changes of the balance are located on a logarithmic grid relative to the
//! data range, then refined with Brent's method from `argmin`. The profile
//! log-likelihood reduces to
//!
//! ```text
//! l(d) = n ln(b / d) - n - n / b
//! ```
//!
//! and a root is only accepted if `l` there is above its neighbouring grid scales
//! and above the large-scale plateau (the exponential limit). Samples whose
//! likelihood keeps rising toward either end of the grid have no interior maximum
//! and are reported as [`FitParetoError::NoBracket`].

use argmin::core::{CostFunction, Executor, State as _};
use argmin::solver::brent::BrentRoot;
use serde::Serialize;

/// Errors from [`ParetoDistribution::fit`].
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum FitParetoError {
    #[display("at least {required} values are required to fit a Pareto distribution, got {count}")]
    TooFewSamples { count: usize, required: usize },
    #[display("value at index {index} is not finite: {value}")]
    NonFiniteValue { index: usize, value: f64 },
    #[display("value at index {index} is outside the Pareto support: {value}")]
    NonPositiveValue { index: usize, value: f64 },
    #[display("all values are equal, the scale is not identifiable")]
    ZeroSpread,
    #[display("likelihood has no interior maximum over the scale parameter")]
    NoBracket,
    #[display("root finder did not converge within {max_iters} iterations")]
    NotConverged { max_iters: u64 },
    #[display("root finder failed: {message}")]
    Solver { message: String },
}

/// Numerical settings for [`ParetoDistribution::fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParetoFitOptions {
    /// Minimum number of values required before a fit is attempted.
    pub min_samples: usize,
    /// Iteration limit for the root finder.
    pub max_iters: u64,
    /// Tolerance on the scale parameter, relative to the bracket width.
    pub relative_tolerance: f64,
}

impl Default for ParetoFitOptions {
    fn default() -> Self {
        Self {
            min_samples: 5,
            max_iters: 200,
            relative_tolerance: 1e-12,
        }
    }
}

/// A Pareto distribution with shape, location and scale.
///
/// # Examples
///
/// ```
/// use paretolens_stats::pareto::ParetoDistribution;
///
/// let dist = ParetoDistribution::new(2.0, 0.0, 1.0).unwrap();
/// assert_eq!(dist.pdf(0.5), 0.0);
/// assert_eq!(dist.pdf(1.0), 2.0);
/// assert_eq!(dist.cdf(2.0), 0.75);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParetoDistribution {
    shape: f64,
    loc: f64,
    scale: f64,
}

impl ParetoDistribution {
    /// Creates a distribution, returning `None` unless `shape` and `scale` are
    /// positive and all parameters are finite.
    #[must_use]
    pub fn new(shape: f64, loc: f64, scale: f64) -> Option<Self> {
        let valid = shape.is_finite()
            && loc.is_finite()
            && scale.is_finite()
            && shape > 0.0
            && scale > 0.0;
        valid.then_some(Self { shape, loc, scale })
    }

    #[must_use]
    pub fn shape(&self) -> f64 {
        self.shape
    }

    #[must_use]
    pub fn loc(&self) -> f64 {
        self.loc
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Lower end of the support, `loc + scale`.
    #[must_use]
    pub fn support_min(&self) -> f64 {
        self.loc + self.scale
    }

    /// Probability density at `x`.
    #[must_use]
    pub fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.loc) / self.scale;
        if z.is_nan() || z < 1.0 {
            return 0.0;
        }
        self.shape / self.scale * z.powf(-(self.shape + 1.0))
    }

    /// Cumulative distribution function at `x`.
    #[must_use]
    pub fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.loc) / self.scale;
        if z.is_nan() || z < 1.0 {
            return 0.0;
        }
        1.0 - z.powf(-self.shape)
    }

    /// Log-likelihood of `values` under this distribution.
    ///
    /// Returns negative infinity if any value lies outside the support.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn log_likelihood(&self, values: &[f64]) -> f64 {
        if values.iter().any(|&x| x < self.support_min()) {
            return f64::NEG_INFINITY;
        }
        let n = values.len() as f64;
        let sum_ln = values.iter().map(|&x| (x - self.loc).ln()).sum::<f64>();
        n * self.shape.ln() + n * self.shape * self.scale.ln() - (self.shape + 1.0) * sum_ln
    }

    /// Fits shape, location and scale to `values` by maximum likelihood.
    ///
    /// # Errors
    ///
    /// * [`FitParetoError::TooFewSamples`] - fewer than `options.min_samples` values
    /// * [`FitParetoError::NonFiniteValue`] / [`FitParetoError::NonPositiveValue`] -
    ///   invalid input values
    /// * [`FitParetoError::ZeroSpread`] - all values are equal
    /// * [`FitParetoError::NoBracket`], [`FitParetoError::NotConverged`],
    ///   [`FitParetoError::Solver`] - numerical failure
    ///
    /// # Examples
    ///
    /// ```
    /// use paretolens_stats::pareto::{ParetoDistribution, ParetoFitOptions};
    ///
    /// let values = [1.0, 1.0, 1.0];
    /// assert!(ParetoDistribution::fit(&values, &ParetoFitOptions::default()).is_err());
    /// ```
    pub fn fit(values: &[f64], options: &ParetoFitOptions) -> Result<Self, FitParetoError> {
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(FitParetoError::NonFiniteValue { index, value });
            }
            if value <= 0.0 {
                return Err(FitParetoError::NonPositiveValue { index, value });
            }
        }
        if values.len() < options.min_samples.max(2) {
            return Err(FitParetoError::TooFewSamples {
                count: values.len(),
                required: options.min_samples.max(2),
            });
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        if range <= 0.0 {
            return Err(FitParetoError::ZeroSpread);
        }

        let problem = ScaleBalance { values, min };
        let grid = problem.grid(range);
        for index in problem.sign_changes(&grid) {
            let scale = problem.solve(grid[index].0, grid[index + 1].0, options)?;
            if problem.is_interior_maximum(scale, &grid, index) {
                let shape = problem.shape(scale);
                return Self::new(shape, min - scale, scale).ok_or(FitParetoError::NoBracket);
            }
        }
        Err(FitParetoError::NoBracket)
    }
}

/// Balance between the location and scale derivatives, as a function of the scale.
///
/// For scale `d` the value is `d * [(b + 1) Σ 1/(x_i - loc) - n b / d]`. Multiplying
/// by `d` keeps the sign and the magnitude in `O(n)`. The profile log-likelihood
/// over `d` has a local maximum where this crosses zero from below.
#[derive(Clone, Copy)]
struct ScaleBalance<'a> {
    values: &'a [f64],
    min: f64,
}

impl ScaleBalance<'_> {
    const GRID_RATIO: f64 = 4.0;
    const GRID_STEPS: i32 = 15;
    const RESIDUAL_PER_SAMPLE: f64 = 1e-7;
    const ROUNDING_MARGIN: f64 = 64.0;
    const LIKELIHOOD_MARGIN: f64 = 1e-12;

    #[expect(clippy::cast_precision_loss)]
    fn shape(&self, scale: f64) -> f64 {
        let n = self.values.len() as f64;
        let sum_log_ratio = self
            .values
            .iter()
            .map(|&x| ((x - self.min) / scale).ln_1p())
            .sum::<f64>();
        n / sum_log_ratio
    }

    #[expect(clippy::cast_precision_loss)]
    fn balance(&self, scale: f64) -> f64 {
        let n = self.values.len() as f64;
        let shape = self.shape(scale);
        let sum_inv = self
            .values
            .iter()
            .map(|&x| scale / (x - self.min + scale))
            .sum::<f64>();
        (shape + 1.0) * sum_inv - n * shape
    }

    /// Profile log-likelihood at scale `d`, with `loc` and `b` at their optimum.
    #[expect(clippy::cast_precision_loss)]
    fn profile_log_likelihood(&self, scale: f64) -> f64 {
        let n = self.values.len() as f64;
        let shape = self.shape(scale);
        n * (shape / scale).ln() - n - n / shape
    }

    /// Rounding error of [`Self::balance`], which cancels two terms of size `n * b`.
    #[expect(clippy::cast_precision_loss)]
    fn balance_noise(&self, scale: f64) -> f64 {
        let n = self.values.len() as f64;
        Self::ROUNDING_MARGIN * f64::EPSILON * n * (self.shape(scale) + 1.0)
    }

    fn grid(&self, range: f64) -> Vec<(f64, f64)> {
        (-Self::GRID_STEPS..=Self::GRID_STEPS)
            .map(|step| range * Self::GRID_RATIO.powi(step))
            .map(|scale| (scale, self.balance(scale)))
            .collect()
    }

    /// Indices of grid pairs where the balance turns from clearly negative to
    /// non-negative.
    fn sign_changes(&self, grid: &[(f64, f64)]) -> impl Iterator<Item = usize> {
        grid.windows(2).enumerate().filter_map(move |(index, pair)| {
            let ((lo, f_lo), (_, f_hi)) = (pair[0], pair[1]);
            let clear = f_lo.is_finite()
                && f_hi.is_finite()
                && f_lo < -self.balance_noise(lo)
                && f_hi >= 0.0;
            clear.then_some(index)
        })
    }

    /// Whether the root found in grid pair `index` beats the grid scales around
    /// it and the largest grid scale.
    fn is_interior_maximum(&self, scale: f64, grid: &[(f64, f64)], index: usize) -> bool {
        let at_root = self.profile_log_likelihood(scale);
        if !at_root.is_finite() {
            return false;
        }
        let margin = Self::LIKELIHOOD_MARGIN * (1.0 + at_root.abs());
        let last = grid.len() - 1;
        let neighbours = index.saturating_sub(1)..=(index + 2).min(last);
        neighbours
            .chain([last])
            .map(|i| grid[i].0)
            .filter(|&other| (other - scale).abs() > f64::EPSILON * scale)
            .all(|other| at_root > self.profile_log_likelihood(other) + margin)
    }

    #[expect(clippy::cast_precision_loss)]
    fn solve(&self, lo: f64, hi: f64, options: &ParetoFitOptions) -> Result<f64, FitParetoError> {
        if self.balance(hi) == 0.0 {
            return Ok(hi);
        }
        let tolerance = (hi - lo) * options.relative_tolerance;
        let solver = BrentRoot::new(lo, hi, tolerance);
        let result = Executor::new(*self, solver)
            .configure(|state| state.max_iters(options.max_iters))
            .run()
            .map_err(|err| FitParetoError::Solver {
                message: err.to_string(),
            })?;
        // Brent keeps its current iterate as the best root estimate
        let state = result.state();
        let scale = state
            .get_param()
            .or_else(|| state.get_best_param())
            .copied()
            .filter(|scale| scale.is_finite() && *scale > 0.0)
            .ok_or(FitParetoError::NoBracket)?;

        let residual_limit = self.values.len() as f64 * Self::RESIDUAL_PER_SAMPLE;
        if self.balance(scale).abs() > residual_limit {
            return Err(FitParetoError::NotConverged {
                max_iters: options.max_iters,
            });
        }
        Ok(scale)
    }
}

impl CostFunction for ScaleBalance<'_> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, scale: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.balance(*scale))
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_distr::Pareto;
    use rand_pcg::Pcg64;

    use super::*;

    fn sample(scale: f64, shape: f64, count: usize, seed: u64) -> Vec<f64> {
        let mut rng = Pcg64::seed_from_u64(seed);
        let dist = Pareto::new(scale, shape).unwrap();
        (0..count).map(|_| rng.sample(dist)).collect()
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        assert!(ParetoDistribution::new(0.0, 0.0, 1.0).is_none());
        assert!(ParetoDistribution::new(1.0, 0.0, -1.0).is_none());
        assert!(ParetoDistribution::new(f64::NAN, 0.0, 1.0).is_none());
        assert!(ParetoDistribution::new(1.0, f64::INFINITY, 1.0).is_none());
    }

    #[test]
    fn test_pdf_matches_cdf_derivative() {
        let dist = ParetoDistribution::new(1.5, 10.0, 3.0).unwrap();
        let x = 17.0;
        let h = 1e-6;
        let numeric = (dist.cdf(x + h) - dist.cdf(x - h)) / (2.0 * h);
        assert!((numeric - dist.pdf(x)).abs() < 1e-6);
        assert_eq!(dist.cdf(dist.support_min()), 0.0);
        assert!(dist.cdf(1e9) > 0.999_999);
    }

    #[test]
    fn test_fit_rejects_degenerate_input() {
        let options = ParetoFitOptions::default();
        assert_eq!(
            ParetoDistribution::fit(&[1.0, 1.0, 1.0], &options),
            Err(FitParetoError::TooFewSamples {
                count: 3,
                required: 5
            })
        );
        assert_eq!(
            ParetoDistribution::fit(&[2.0; 10], &options),
            Err(FitParetoError::ZeroSpread)
        );
        assert_eq!(
            ParetoDistribution::fit(&[1.0, 2.0, 0.0, 4.0, 5.0], &options),
            Err(FitParetoError::NonPositiveValue {
                index: 2,
                value: 0.0
            })
        );
        assert!(matches!(
            ParetoDistribution::fit(&[1.0, f64::NAN, 3.0, 4.0, 5.0], &options),
            Err(FitParetoError::NonFiniteValue { index: 1, .. })
        ));
    }

    #[test]
    fn test_fit_without_interior_maximum() {
        let options = ParetoFitOptions::default();
        // Likelihood keeps rising as the scale shrinks
        assert_eq!(
            ParetoDistribution::fit(&[1.0, 1.5, 3.0, 10.0, 100.0], &options),
            Err(FitParetoError::NoBracket)
        );
        // Likelihood keeps rising toward the exponential limit
        assert_eq!(
            ParetoDistribution::fit(&[1.0, 2.0, 3.0, 4.0, 5.0], &options),
            Err(FitParetoError::NoBracket)
        );
    }

    #[test]
    fn test_fit_small_sample_with_interior_maximum() {
        let values = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0, 256.0, 1000.0];
        let fit = ParetoDistribution::fit(&values, &ParetoFitOptions::default()).unwrap();
        assert!((fit.shape() - 0.465_822).abs() < 1e-5, "shape = {}", fit.shape());
        assert!((fit.scale() - 4.033_206).abs() < 1e-4, "scale = {}", fit.scale());

        let problem = ScaleBalance {
            values: &values,
            min: 1.0,
        };
        let best = problem.profile_log_likelihood(fit.scale());
        for scale in [0.1, 1.0, 2.0, 8.0, 16.0, 1e6] {
            assert!(best > problem.profile_log_likelihood(scale), "scale = {scale}");
        }
    }

    #[test]
    fn test_fit_recovers_parameters() {
        let values = sample(2.0, 3.0, 20_000, 7);
        let fit = ParetoDistribution::fit(&values, &ParetoFitOptions::default()).unwrap();

        assert!((fit.shape() - 3.0).abs() < 0.5, "shape = {}", fit.shape());
        assert!((fit.scale() - 2.0).abs() < 0.5, "scale = {}", fit.scale());
        assert!(fit.loc().abs() < 0.5, "loc = {}", fit.loc());
    }

    #[test]
    fn test_fit_support_starts_at_sample_minimum() {
        let values = sample(5.0, 1.2, 2_000, 42);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let fit = ParetoDistribution::fit(&values, &ParetoFitOptions::default()).unwrap();

        assert!((fit.support_min() - min).abs() <= 1e-9 * min);
        assert!(fit.log_likelihood(&values).is_finite());
    }

    #[test]
    fn test_fit_is_stationary_point() {
        let values = sample(1.0, 2.5, 5_000, 3);
        let fit = ParetoDistribution::fit(&values, &ParetoFitOptions::default()).unwrap();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let problem = ScaleBalance {
            values: &values,
            min,
        };
        assert!(problem.balance(fit.scale()).abs() < 5_000.0 * 1e-7);
        assert!((problem.shape(fit.scale()) - fit.shape()).abs() < 1e-12);
    }
}
