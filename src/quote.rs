//! A complete quote: one installation run through every calculation.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{ConfigError, QuoteConfig};
use crate::electrical::{
    ArraySpecification, BatterySpecification, CableRuns, ComplianceResult, InverterSpecification,
    ProtectionFlags, evaluate_compliance,
};
use crate::error::ValidationError;
use crate::finance::{FinancialProjection, ProjectionOptions, project_financials};
use crate::rebate::{
    EligibilityChecklist, EligibilityReport, RebateSubmission, SolarZone, StcCalculator, StcResult,
    estimate_battery_rebate, validate_eligibility,
};

/// Money side of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteFinancials {
    pub system_cost: f64,
    pub annual_savings: f64,
    pub feed_in_revenue: f64,
}

/// One installation as described in a quote file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteInput {
    #[serde(default)]
    pub customer: String,
    pub zone: SolarZone,
    pub installation_year: i32,
    pub array: ArraySpecification,
    pub inverter: InverterSpecification,
    #[serde(default)]
    pub battery: Option<BatterySpecification>,
    pub cables: CableRuns,
    pub protection: ProtectionFlags,
    pub checklist: EligibilityChecklist,
    pub financials: QuoteFinancials,
    /// Replaces the configured `[finance]` assumptions for this quote only.
    #[serde(default)]
    pub projection: Option<ProjectionOptions>,
}

impl QuoteInput {
    /// Reads a quote from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or does not parse.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("quote", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// # Errors
    ///
    /// Returns a `ConfigError` on invalid TOML, unknown fields, missing
    /// required fields, or a zone outside 1–4.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("quote", e.to_string()))
    }
}

/// Every calculation for one quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteReport {
    pub customer: String,
    pub system_size_kw: f64,
    pub stc: StcResult,
    pub battery_rebate: Option<f64>,
    pub eligibility: EligibilityReport,
    pub compliance: ComplianceResult,
    pub projection: FinancialProjection,
}

impl QuoteReport {
    /// Runs the rebate, eligibility, compliance and projection calculations.
    ///
    /// The components are independent; the first validation failure aborts
    /// the whole quote.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` raised by any component.
    pub fn build(input: &QuoteInput, config: &QuoteConfig) -> Result<Self, ValidationError> {
        let stc = StcCalculator::from_config(&config.rebate).calculate(
            input.array.system_size_kw,
            input.zone,
            input.installation_year,
        )?;
        let battery_rebate = input
            .battery
            .as_ref()
            .map(|b| estimate_battery_rebate(b, &config.rebate))
            .transpose()?;
        let eligibility = validate_eligibility(&input.checklist);
        let compliance = evaluate_compliance(
            &input.array,
            &input.inverter,
            &input.cables,
            &input.protection,
            &config.electrical,
        )?;
        let options = input.projection.as_ref().unwrap_or(&config.finance);
        let projection = project_financials(
            input.financials.system_cost,
            input.financials.annual_savings,
            input.financials.feed_in_revenue,
            options,
        )?;

        if !compliance.is_compliant {
            warn!(
                customer = %input.customer,
                recommendations = compliance.recommendations.len(),
                "quoted design is not electrically compliant"
            );
        }
        info!(
            customer = %input.customer,
            stc_count = stc.stc_count,
            eligible = eligibility.eligible,
            compliant = compliance.is_compliant,
            break_even_year = projection.break_even_year,
            "quote built"
        );

        Ok(Self {
            customer: input.customer.clone(),
            system_size_kw: input.array.system_size_kw,
            stc,
            battery_rebate,
            eligibility,
            compliance,
            projection,
        })
    }

    /// STC value plus any battery rebate.
    pub fn total_rebate(&self) -> f64 {
        self.stc.stc_value + self.battery_rebate.unwrap_or(0.0)
    }

    /// Opens a `PENDING` rebate claim for this quote.
    pub fn rebate_submission(&self, id: impl Into<String>) -> RebateSubmission {
        RebateSubmission::new(id, &self.stc, self.system_size_kw)
    }
}

impl fmt::Display for QuoteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.customer.is_empty() {
            writeln!(f, "Quote for {}", self.customer)?;
            writeln!(f)?;
        }
        writeln!(f, "{}", self.stc)?;
        if let Some(rebate) = self.battery_rebate {
            writeln!(f, "Battery rebate:        ${rebate:.0}")?;
        }
        writeln!(f, "Total rebate:          ${:.0}", self.total_rebate())?;
        writeln!(f)?;

        writeln!(f, "--- Rebate Eligibility ---")?;
        writeln!(
            f,
            "Eligible:              {}",
            if self.eligibility.eligible { "yes" } else { "no" }
        )?;
        for missing in &self.eligibility.missing_requirements {
            writeln!(f, "  missing: {missing}")?;
        }
        for warning in &self.eligibility.warnings {
            writeln!(f, "  warning: {warning}")?;
        }
        writeln!(f)?;

        writeln!(f, "{}", self.compliance)?;
        write!(f, "{}", self.projection.rounded())
    }
}
