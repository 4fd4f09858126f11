use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ValidationError, ensure_finite, ensure_non_negative, ensure_positive};

/// Length of every projection series (years).
pub const PROJECTION_YEARS: u32 = 25;

/// Tunable assumptions for [`project_financials`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionOptions {
    /// Annual tariff escalation (fraction per year).
    pub electricity_rate_increase: f64,
    /// Annual production loss, compounded (fraction per year).
    pub system_degradation: f64,
    /// Year in which the replacement cost is charged. Outside 1..=25 it is
    /// never charged.
    pub inverter_replacement_year: u32,
    pub inverter_replacement_cost: f64,
    pub discount_rate: f64,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            electricity_rate_increase: 0.03,
            system_degradation: 0.005,
            inverter_replacement_year: 12,
            inverter_replacement_cost: 2000.0,
            discount_rate: 0.05,
        }
    }
}

impl ProjectionOptions {
    /// Checks every assumption is usable.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let rate = ensure_finite("electricity_rate_increase", self.electricity_rate_increase)?;
        if rate <= -1.0 {
            return Err(ValidationError::OutOfRange {
                field: "electricity_rate_increase",
                expected: "> -1",
                value: rate,
            });
        }
        let degradation = ensure_non_negative("system_degradation", self.system_degradation)?;
        if degradation >= 1.0 {
            return Err(ValidationError::OutOfRange {
                field: "system_degradation",
                expected: "in [0, 1)",
                value: degradation,
            });
        }
        ensure_non_negative("inverter_replacement_cost", self.inverter_replacement_cost)?;
        let discount = ensure_finite("discount_rate", self.discount_rate)?;
        if discount <= -1.0 {
            return Err(ValidationError::OutOfRange {
                field: "discount_rate",
                expected: "> -1",
                value: discount,
            });
        }
        Ok(())
    }
}

/// One simulated year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    pub year: u32,
    pub yearly_savings: f64,
    pub yearly_revenue: f64,
    /// Savings plus revenue, less any inverter replacement charged this year.
    pub yearly_total: f64,
    /// Running net position including the upfront cost.
    pub cumulative_savings: f64,
    /// Remaining production relative to new, rounded to a whole percent.
    pub production_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProjection {
    pub series: Vec<YearProjection>,
    /// First year with a non-negative cumulative position, or the horizon
    /// when none qualifies. See [`FinancialProjection::breaks_even_within_horizon`].
    pub break_even_year: u32,
    /// Cumulative position at the end of the horizon.
    pub total_savings: f64,
    /// Feed-in revenue summed over the horizon.
    pub total_revenue: f64,
    pub roi_percent: f64,
    pub npv: f64,
}

impl FinancialProjection {
    /// Distinguishes "breaks even in the final year" from "never breaks even".
    ///
    /// A projection that breaks even early and is pulled negative again by a
    /// late replacement still counts as breaking even.
    pub fn breaks_even_within_horizon(&self) -> bool {
        // `rounded` keeps the sign of a small loss as -0.0
        self.break_even_year < PROJECTION_YEARS
            || self
                .series
                .last()
                .is_some_and(|y| y.cumulative_savings.is_sign_positive())
    }

    /// Copy with every monetary value rounded to a whole currency unit, for
    /// presentation. [`FinancialProjection::breaks_even_within_horizon`]
    /// gives the same answer on the copy as on the original.
    pub fn rounded(&self) -> Self {
        Self {
            series: self
                .series
                .iter()
                .map(|y| YearProjection {
                    yearly_savings: y.yearly_savings.round(),
                    yearly_revenue: y.yearly_revenue.round(),
                    yearly_total: y.yearly_total.round(),
                    cumulative_savings: y.cumulative_savings.round(),
                    ..y.clone()
                })
                .collect(),
            break_even_year: self.break_even_year,
            total_savings: self.total_savings.round(),
            total_revenue: self.total_revenue.round(),
            roi_percent: self.roi_percent,
            npv: self.npv.round(),
        }
    }
}

impl fmt::Display for FinancialProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {PROJECTION_YEARS}-Year Financial Projection ---")?;
        if self.breaks_even_within_horizon() {
            writeln!(f, "Break-even year:       {}", self.break_even_year)?;
        } else {
            writeln!(f, "Break-even year:       not within {PROJECTION_YEARS} years")?;
        }
        writeln!(f, "Total net savings:     ${:.0}", self.total_savings)?;
        writeln!(f, "Feed-in revenue:       ${:.0}", self.total_revenue)?;
        writeln!(f, "ROI:                   {:.1}%", self.roi_percent)?;
        writeln!(f, "NPV:                   ${:.0}", self.npv)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>4} {:>10} {:>10} {:>10} {:>12} {:>6}",
            "Year", "Savings", "Feed-in", "Net", "Cumulative", "Prod%"
        )?;
        for y in &self.series {
            writeln!(
                f,
                "{:>4} {:>10.0} {:>10.0} {:>10.0} {:>12.0} {:>6}",
                y.year,
                y.yearly_savings,
                y.yearly_revenue,
                y.yearly_total,
                y.cumulative_savings,
                y.production_percent
            )?;
        }
        Ok(())
    }
}

/// Simulates the 25-year cash flow of an installation.
///
/// Each year degrades production by `system_degradation` (compounding, from
/// the first year on) and escalates tariffs by `electricity_rate_increase`.
/// Values are carried at full precision; use [`FinancialProjection::rounded`]
/// for display.
///
/// # Arguments
///
/// * `system_cost` - Upfront cost, charged at year 0
/// * `annual_savings` - First-year bill savings before degradation
/// * `feed_in_revenue` - First-year export revenue before degradation
/// * `options` - Escalation, degradation, replacement and discount assumptions
///
/// # Errors
///
/// Returns `ValidationError` if `system_cost` is not positive, savings or
/// revenue is negative, any value is non-finite, or `options` fail
/// [`ProjectionOptions::validate`].
pub fn project_financials(
    system_cost: f64,
    annual_savings: f64,
    feed_in_revenue: f64,
    options: &ProjectionOptions,
) -> Result<FinancialProjection, ValidationError> {
    ensure_positive("system_cost", system_cost)?;
    ensure_non_negative("annual_savings", annual_savings)?;
    ensure_non_negative("feed_in_revenue", feed_in_revenue)?;
    options.validate()?;

    let mut series = Vec::with_capacity(PROJECTION_YEARS as usize);
    let mut cumulative = -system_cost;
    let mut production_factor = 1.0;
    let mut total_revenue = 0.0;
    let mut discounted = 0.0;
    let mut break_even_year = None;

    for year in 1..=PROJECTION_YEARS {
        production_factor *= 1.0 - options.system_degradation;
        let rate_multiplier = (1.0 + options.electricity_rate_increase).powi(year as i32 - 1);

        let yearly_savings = annual_savings * production_factor * rate_multiplier;
        let yearly_revenue = feed_in_revenue * production_factor * rate_multiplier;
        let mut yearly_total = yearly_savings + yearly_revenue;
        if year == options.inverter_replacement_year {
            yearly_total -= options.inverter_replacement_cost;
        }

        cumulative += yearly_total;
        total_revenue += yearly_revenue;
        discounted += yearly_total / (1.0 + options.discount_rate).powi(year as i32);
        if break_even_year.is_none() && cumulative >= 0.0 {
            break_even_year = Some(year);
        }

        series.push(YearProjection {
            year,
            yearly_savings,
            yearly_revenue,
            yearly_total,
            cumulative_savings: cumulative,
            production_percent: (production_factor * 100.0).round() as u32,
        });
    }

    let total_savings = cumulative;
    let projection = FinancialProjection {
        series,
        break_even_year: break_even_year.unwrap_or(PROJECTION_YEARS),
        total_savings,
        total_revenue,
        roi_percent: (total_savings + system_cost) / system_cost * 100.0,
        npv: discounted - system_cost,
    };

    debug!(
        system_cost,
        break_even_year = projection.break_even_year,
        total_savings,
        npv = projection.npv,
        "projected financials"
    );

    Ok(projection)
}
