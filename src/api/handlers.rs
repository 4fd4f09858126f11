//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use super::AppState;
use super::types::{
    ApiError, ComplianceRequest, ProjectionRequest, StcRequest, TransitionRequest,
    TransitionResponse,
};
use crate::electrical::{ComplianceResult, evaluate_compliance};
use crate::finance::{FinancialProjection, project_financials};
use crate::quote::{QuoteInput, QuoteReport};
use crate::rebate::{
    EligibilityChecklist, EligibilityReport, StcResult, calculate_stcs, validate_eligibility,
    validate_transition,
};

/// `POST /stc` → 200 + `StcResult`, or 400 on bad size or zone.
pub async fn post_stc(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StcRequest>,
) -> Result<Json<StcResult>, ApiError> {
    let result = calculate_stcs(
        req.system_size_kw,
        req.zone,
        req.installation_year,
        &state.config.rebate,
    )?;
    Ok(Json(result))
}

/// `POST /eligibility` → 200 + `EligibilityReport`.
pub async fn post_eligibility(
    Json(checklist): Json<EligibilityChecklist>,
) -> Json<EligibilityReport> {
    Json(validate_eligibility(&checklist))
}

/// `POST /compliance` → 200 + `ComplianceResult`, compliant or not.
pub async fn post_compliance(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ComplianceRequest>,
) -> Result<Json<ComplianceResult>, ApiError> {
    let result = evaluate_compliance(
        &req.array,
        &req.inverter,
        &req.cables,
        &req.protection,
        &state.config.electrical,
    )?;
    Ok(Json(result))
}

/// `POST /projection` → 200 + `FinancialProjection` at full precision.
pub async fn post_projection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProjectionRequest>,
) -> Result<Json<FinancialProjection>, ApiError> {
    let options = req.options.as_ref().unwrap_or(&state.config.finance);
    let projection = project_financials(
        req.system_cost,
        req.annual_savings,
        req.feed_in_revenue,
        options,
    )?;
    Ok(Json(projection))
}

/// `POST /quote` → 200 + `QuoteReport`.
pub async fn post_quote(
    State(state): State<Arc<AppState>>,
    Json(input): Json<QuoteInput>,
) -> Result<Json<QuoteReport>, ApiError> {
    Ok(Json(QuoteReport::build(&input, &state.config)?))
}

/// `POST /submission/transition` → 200 if legal, 409 otherwise.
///
/// Only checks legality; the caller owns persistence.
pub async fn post_transition(
    Json(req): Json<TransitionRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    validate_transition(req.from, req.to)?;
    Ok(Json(TransitionResponse {
        from: req.from,
        to: req.to,
        allowed: true,
    }))
}
