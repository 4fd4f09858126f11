//! Error taxonomy shared by the calculation components.

use thiserror::Error;

use crate::rebate::submission::SubmissionStatus;

/// Malformed or out-of-range input, raised before any computation proceeds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be > 0, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },

    #[error("unrecognized solar zone {0} (expected 1-4)")]
    UnknownZone(u8),

    #[error("inverter phases must be 1 or 3, got {0}")]
    InvalidPhases(u8),

    #[error("{0} mm² is not a standard cable size")]
    UnknownCableSize(f64),

    #[error("submission is not eligible: missing {}", .missing.join("; "))]
    NotEligible { missing: Vec<String> },
}

/// Illegal rebate-submission state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid rebate submission transition {from} -> {to}")]
pub struct InvalidTransitionError {
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
}

/// Either failure kind, for operations that validate input and then move a
/// submission through its lifecycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] InvalidTransitionError),
}

/// Rejects NaN and infinities.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

/// Requires a finite value strictly greater than zero.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    ensure_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

/// Requires a finite value greater than or equal to zero.
pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: f64,
) -> Result<f64, ValidationError> {
    ensure_finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::Negative { field, value })
    }
}
