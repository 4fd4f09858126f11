//! API request, response and error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::electrical::{ArraySpecification, CableRuns, InverterSpecification, ProtectionFlags};
use crate::error::{InvalidTransitionError, QuoteError, ValidationError};
use crate::finance::ProjectionOptions;
use crate::rebate::SubmissionStatus;

/// `POST /stc` body. `zone` is a raw number so that an unknown zone is
/// reported as a validation failure rather than a decode failure.
#[derive(Debug, Deserialize)]
pub struct StcRequest {
    pub system_size_kw: f64,
    pub zone: u8,
    pub installation_year: i32,
}

/// `POST /compliance` body.
#[derive(Debug, Deserialize)]
pub struct ComplianceRequest {
    pub array: ArraySpecification,
    pub inverter: InverterSpecification,
    pub cables: CableRuns,
    pub protection: ProtectionFlags,
}

/// `POST /projection` body. Omitted `options` fall back to the server's
/// configured assumptions.
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    pub system_cost: f64,
    pub annual_savings: f64,
    pub feed_in_revenue: f64,
    #[serde(default)]
    pub options: Option<ProjectionOptions>,
}

/// `POST /submission/transition` body.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
    pub allowed: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// `validation` or `invalid_transition`.
    pub kind: &'static str,
    /// Human-readable error message.
    pub error: String,
}

/// Handler failure, mapped to 400 or 409.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    Transition(InvalidTransitionError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<InvalidTransitionError> for ApiError {
    fn from(err: InvalidTransitionError) -> Self {
        Self::Transition(err)
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::Validation(e) => Self::Validation(e),
            QuoteError::Transition(e) => Self::Transition(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, error) = match self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, "validation", e.to_string()),
            Self::Transition(e) => (StatusCode::CONFLICT, "invalid_transition", e.to_string()),
        };
        (status, Json(ErrorResponse { kind, error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_request_uses_upper_case_states() {
        let req: Result<TransitionRequest, _> =
            serde_json::from_str(r#"{"from":"REJECTED","to":"SUBMITTED"}"#);
        let req = req.unwrap();
        assert_eq!(req.from, SubmissionStatus::Rejected);
        assert_eq!(req.to, SubmissionStatus::Submitted);
    }

    #[test]
    fn quote_error_maps_to_status() {
        let validation = ApiError::from(QuoteError::from(ValidationError::UnknownZone(9)));
        assert_eq!(validation.into_response().status(), StatusCode::BAD_REQUEST);

        let transition = ApiError::from(QuoteError::from(InvalidTransitionError {
            from: SubmissionStatus::Paid,
            to: SubmissionStatus::Pending,
        }));
        assert_eq!(transition.into_response().status(), StatusCode::CONFLICT);
    }
}
