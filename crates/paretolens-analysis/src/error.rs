//! Error taxonomy for concentration analysis
//!
//! Three categories are distinguished so callers can decide how far a failure
//! reaches:
//!
//! - [`ValidationError`]: malformed or out-of-domain input. Fatal to the step.
//! - [`DivisionError`]: a required denominator is zero. Fatal to the step.
//! - [`FitError`]: the Pareto fit failed. Recoverable, the overlay is skipped.
//!
//! [`AnalysisError`] wraps all three so `?` composes across operations.

use std::fmt;

use paretolens_stats::pareto::FitParetoError;
use serde::Serializer;

use crate::series::EntityId;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ValidationError {
    #[display("series is empty")]
    EmptySeries,
    #[display("value for entity '{entity}' is not finite: {value}")]
    NonFiniteValue { entity: EntityId, value: f64 },
    #[display("entity '{entity}' appears more than once")]
    DuplicateEntity { entity: EntityId },
    #[display("value at index {index} must be positive for a Pareto fit: {value}")]
    NonPositiveValue { index: usize, value: f64 },
    #[display("value at index {index} is not finite: {value}")]
    NonFiniteSample { index: usize, value: f64 },
    #[display("checkpoint {checkpoint} is outside [0, 100]")]
    CheckpointOutOfRange { checkpoint: f64 },
    #[display("checkpoints must be in ascending order")]
    CheckpointsNotAscending,
    #[display("curve needs at least 2 points, got {count}")]
    CurveTooShort { count: usize },
    #[display("decile bucket {index} does not exist or is empty")]
    EmptyBucket { index: usize },
    #[display("{name} must be at least {min}, got {value}")]
    ParameterTooSmall {
        name: &'static str,
        min: usize,
        value: usize,
    },
    #[display("no dates given")]
    NoDates,
}

/// A percentage or rate whose denominator is zero.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{quantity} is undefined: its denominator is zero")]
pub struct DivisionError {
    pub quantity: &'static str,
}

impl DivisionError {
    #[must_use]
    pub fn new(quantity: &'static str) -> Self {
        Self { quantity }
    }
}

/// The Pareto maximum-likelihood fit did not produce parameters.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("Pareto fit failed: {source}")]
pub struct FitError {
    pub source: FitParetoError,
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    derive_more::Display,
    derive_more::Error,
    derive_more::From,
    derive_more::IsVariant,
)]
pub enum AnalysisError {
    #[display("{_0}")]
    Validation(ValidationError),
    #[display("{_0}")]
    Division(DivisionError),
    #[display("{_0}")]
    Fit(FitError),
}

impl AnalysisError {
    /// Whether the caller may skip the affected output and carry on.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.is_fit()
    }
}

impl From<FitParetoError> for AnalysisError {
    fn from(source: FitParetoError) -> Self {
        match source {
            FitParetoError::NonPositiveValue { index, value } => {
                ValidationError::NonPositiveValue { index, value }.into()
            }
            FitParetoError::NonFiniteValue { index, value } => {
                ValidationError::NonFiniteSample { index, value }.into()
            }
            source => FitError { source }.into(),
        }
    }
}

pub(crate) fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
