//! Rebate-submission lifecycle.
//!
//! ```text
//! PENDING -> SUBMITTED -> APPROVED -> PAID
//!                      \-> REJECTED
//! ```
//!
//! `PAID` and `REJECTED` are terminal. A rejected claim is never reopened;
//! [`RebateSubmission::resubmit`] starts a new one instead.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::eligibility::EligibilityReport;
use super::stc::StcResult;
use crate::error::{InvalidTransitionError, QuoteError, ValidationError};

/// Lifecycle state of a rebate submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    /// Created at first calculation; no claim filed.
    #[default]
    Pending,
    Submitted,
    Approved,
    Rejected,
    Paid,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 5] = [
        Self::Pending,
        Self::Submitted,
        Self::Approved,
        Self::Rejected,
        Self::Paid,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Paid => "PAID",
        }
    }

    /// Checks if a transition from this state to `target` is legal.
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Submitted)
                | (Self::Submitted, Self::Approved)
                | (Self::Submitted, Self::Rejected)
                | (Self::Approved, Self::Paid)
        )
    }

    /// No transition leaves a terminal state.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Rejected)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown submission status \"{s}\""))
    }
}

/// Single point of truth for lifecycle legality, shared by every caller.
///
/// # Errors
///
/// Returns `InvalidTransitionError` when `from -> to` is not in the table.
pub fn validate_transition(
    from: SubmissionStatus,
    to: SubmissionStatus,
) -> Result<(), InvalidTransitionError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        warn!(%from, %to, "rejected rebate submission transition");
        Err(InvalidTransitionError { from, to })
    }
}

/// In-memory view of a persisted rebate claim.
///
/// The persistence layer owns the row; this type only enforces which status
/// changes are legal before the caller writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebateSubmission {
    pub id: String,
    pub status: SubmissionStatus,
    pub stc_count: u32,
    pub stc_value: f64,
    pub system_size_kw: f64,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl RebateSubmission {
    /// Creates a `PENDING` submission from a completed STC calculation.
    pub fn new(id: impl Into<String>, stc: &StcResult, system_size_kw: f64) -> Self {
        Self {
            id: id.into(),
            status: SubmissionStatus::Pending,
            stc_count: stc.stc_count,
            stc_value: stc.stc_value,
            system_size_kw,
            submitted_at: None,
        }
    }

    /// Files the claim: `PENDING -> SUBMITTED`, stamping `submitted_at`.
    ///
    /// # Errors
    ///
    /// `ValidationError::NotEligible` if the eligibility report is negative,
    /// `ValidationError::NonPositive` if the claim has no certificates, and
    /// `InvalidTransitionError` if the submission is not `PENDING`.
    pub fn submit(
        &mut self,
        eligibility: &EligibilityReport,
        submitted_at: DateTime<Utc>,
    ) -> Result<(), QuoteError> {
        validate_transition(self.status, SubmissionStatus::Submitted)?;
        if !eligibility.eligible {
            return Err(ValidationError::NotEligible {
                missing: eligibility.missing_requirements.clone(),
            }
            .into());
        }
        if self.stc_count == 0 {
            return Err(ValidationError::NonPositive {
                field: "stc_count",
                value: 0.0,
            }
            .into());
        }
        self.status = SubmissionStatus::Submitted;
        self.submitted_at = Some(submitted_at);
        info!(id = %self.id, stc_count = self.stc_count, "rebate submission filed");
        Ok(())
    }

    /// Records the issuing authority's approval.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransitionError` unless the submission is `SUBMITTED`.
    pub fn approve(&mut self) -> Result<(), InvalidTransitionError> {
        self.transition_to(SubmissionStatus::Approved)
    }

    /// Records the issuing authority's rejection.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransitionError` unless the submission is `SUBMITTED`.
    pub fn reject(&mut self) -> Result<(), InvalidTransitionError> {
        self.transition_to(SubmissionStatus::Rejected)
    }

    /// Records payment of an approved claim.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransitionError` unless the submission is `APPROVED`.
    pub fn mark_paid(&mut self) -> Result<(), InvalidTransitionError> {
        self.transition_to(SubmissionStatus::Paid)
    }

    /// Applies an externally driven status change after checking the table.
    ///
    /// `SUBMITTED` must go through [`submit`](Self::submit) so that eligibility
    /// is checked; requesting it here is always rejected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransitionError` for any illegal change.
    pub fn transition_to(
        &mut self,
        target: SubmissionStatus,
    ) -> Result<(), InvalidTransitionError> {
        if target == SubmissionStatus::Submitted {
            return Err(InvalidTransitionError {
                from: self.status,
                to: target,
            });
        }
        validate_transition(self.status, target)?;
        info!(id = %self.id, from = %self.status, to = %target, "rebate submission status changed");
        self.status = target;
        Ok(())
    }

    /// Starts a fresh `PENDING` claim from a rejected one.
    ///
    /// The rejected submission is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransitionError` (`status -> PENDING`) unless this
    /// submission is `REJECTED`.
    pub fn resubmit(&self, new_id: impl Into<String>) -> Result<Self, InvalidTransitionError> {
        if self.status != SubmissionStatus::Rejected {
            return Err(InvalidTransitionError {
                from: self.status,
                to: SubmissionStatus::Pending,
            });
        }
        Ok(Self {
            id: new_id.into(),
            status: SubmissionStatus::Pending,
            stc_count: self.stc_count,
            stc_value: self.stc_value,
            system_size_kw: self.system_size_kw,
            submitted_at: None,
        })
    }
}
