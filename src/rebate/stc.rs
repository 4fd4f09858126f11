use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::zone::{SolarZone, ZoneRatingTable};
use crate::config::RebateConfig;
use crate::electrical::BatterySpecification;
use crate::error::{ValidationError, ensure_positive};

/// Slack added before flooring so products such as `x.9999999999` that are
/// integral in exact arithmetic do not lose a certificate.
const FLOOR_EPSILON: f64 = 1e-9;

/// Human-readable intermediate steps of an STC calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StcCalculationSteps {
    pub step1: String,
    pub step2: String,
    pub step3: String,
    pub step4: String,
}

/// STC entitlement for one installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StcResult {
    /// Number of certificates (floored).
    pub stc_count: u32,
    /// `stc_count * market_price_per_stc`, in quote currency units.
    pub stc_value: f64,
    pub zone: SolarZone,
    /// Insolation for `zone` (kWh/kW/day).
    pub zone_rating: f64,
    pub deeming_period_years: u32,
    pub calculation: StcCalculationSteps,
}

impl fmt::Display for StcResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- STC Rebate ---")?;
        writeln!(f, "Certificates:          {} STCs", self.stc_count)?;
        writeln!(f, "Estimated value:       ${:.2}", self.stc_value)?;
        writeln!(
            f,
            "{}:                {} kWh/kW/day",
            self.zone, self.zone_rating
        )?;
        writeln!(
            f,
            "Deeming period:        {} years",
            self.deeming_period_years
        )?;
        writeln!(f, "  - {}", self.calculation.step1)?;
        writeln!(f, "  - {}", self.calculation.step2)?;
        writeln!(f, "  - {}", self.calculation.step3)?;
        write!(f, "  - {}", self.calculation.step4)
    }
}

/// Remaining deeming years for a system installed in `installation_year`.
///
/// Shrinks by one per calendar year and is clamped at zero once the horizon
/// is reached.
pub fn deeming_period_years(installation_year: i32, deeming_horizon_year: i32) -> u32 {
    u32::try_from(deeming_horizon_year.saturating_sub(installation_year)).unwrap_or(0)
}

/// Computes STC entitlements from injected pricing and zone reference data.
#[derive(Debug, Clone)]
pub struct StcCalculator {
    zone_ratings: ZoneRatingTable,
    market_price_per_stc: f64,
    deeming_horizon_year: i32,
}

impl StcCalculator {
    /// Creates a calculator with explicit reference data.
    pub fn new(
        zone_ratings: ZoneRatingTable,
        market_price_per_stc: f64,
        deeming_horizon_year: i32,
    ) -> Self {
        Self {
            zone_ratings,
            market_price_per_stc,
            deeming_horizon_year,
        }
    }

    /// Creates a calculator from the `[rebate]` configuration section.
    pub fn from_config(cfg: &RebateConfig) -> Self {
        Self::new(
            ZoneRatingTable::from_config(&cfg.zone_ratings),
            cfg.market_price_per_stc,
            cfg.deeming_horizon_year,
        )
    }

    /// Calculates certificate count and value.
    ///
    /// `stc_count = floor(system_size_kw * zone_rating * deeming_period_years)`
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `system_size_kw`, the market price or the
    /// zone's rating is not a positive finite number.
    pub fn calculate(
        &self,
        system_size_kw: f64,
        zone: SolarZone,
        installation_year: i32,
    ) -> Result<StcResult, ValidationError> {
        ensure_positive("system_size_kw", system_size_kw)?;
        ensure_positive("rebate.market_price_per_stc", self.market_price_per_stc)?;
        let zone_rating = ensure_positive("rebate.zone_ratings", self.zone_ratings.rating(zone))?;
        let deeming = deeming_period_years(installation_year, self.deeming_horizon_year);
        let raw = system_size_kw * zone_rating * f64::from(deeming);
        // raw is finite and non-negative here, and bounded well below u32::MAX
        // for any physical system size
        let stc_count = (raw + FLOOR_EPSILON).floor().min(f64::from(u32::MAX)) as u32;
        let stc_value = f64::from(stc_count) * self.market_price_per_stc;

        debug!(
            system_size_kw,
            zone = zone.number(),
            installation_year,
            deeming,
            stc_count,
            "calculated STC entitlement"
        );

        Ok(StcResult {
            stc_count,
            stc_value,
            zone,
            zone_rating,
            deeming_period_years: deeming,
            calculation: StcCalculationSteps {
                step1: format!("System size: {system_size_kw} kW"),
                step2: format!("{zone} rating: {zone_rating} kWh/kW/day"),
                step3: format!(
                    "Deeming period: {deeming} years ({installation_year} to {})",
                    self.deeming_horizon_year
                ),
                step4: format!(
                    "{system_size_kw} × {zone_rating} × {deeming} = {raw:.2} → {stc_count} STCs"
                ),
            },
        })
    }
}

/// Calculates STCs for a raw zone number.
///
/// # Errors
///
/// Returns `ValidationError::UnknownZone` for zones outside 1–4, or any error
/// from [`StcCalculator::calculate`].
pub fn calculate_stcs(
    system_size_kw: f64,
    zone: u8,
    installation_year: i32,
    cfg: &RebateConfig,
) -> Result<StcResult, ValidationError> {
    let zone = SolarZone::try_from(zone)?;
    StcCalculator::from_config(cfg).calculate(system_size_kw, zone, installation_year)
}

/// Federal battery rebate estimate, rounded to whole currency units.
///
/// # Errors
///
/// Returns `ValidationError` if the battery capacity or the configured rate is
/// not positive, or the usable fraction is outside `(0, 1]`.
pub fn estimate_battery_rebate(
    battery: &BatterySpecification,
    cfg: &RebateConfig,
) -> Result<f64, ValidationError> {
    let capacity = ensure_positive("battery.capacity_kwh", battery.capacity_kwh)?;
    let rate = ensure_positive(
        "rebate.battery_rebate_per_usable_kwh",
        cfg.battery_rebate_per_usable_kwh,
    )?;
    let fraction = ensure_positive("rebate.battery_usable_fraction", cfg.battery_usable_fraction)?;
    if fraction > 1.0 {
        return Err(ValidationError::OutOfRange {
            field: "rebate.battery_usable_fraction",
            expected: "in (0, 1]",
            value: fraction,
        });
    }
    Ok((capacity * fraction * rate).round())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> StcCalculator {
        StcCalculator::from_config(&RebateConfig::default())
    }

    #[test]
    fn zone_3_reference_installation() {
        // 6.6 * 1.382 * 7 = 63.86
        let result = calculator().calculate(6.6, SolarZone::Zone3, 2023);
        let result = result.ok();
        assert_eq!(result.as_ref().map(|r| r.deeming_period_years), Some(7));
        assert_eq!(result.as_ref().map(|r| r.stc_count), Some(63));
        assert_eq!(result.as_ref().map(|r| r.stc_value), Some(63.0 * 38.0));
        assert_eq!(result.as_ref().map(|r| r.zone_rating), Some(1.382));
    }

    #[test]
    fn deeming_period_counts_down_to_zero() {
        assert_eq!(deeming_period_years(2023, 2030), 7);
        assert_eq!(deeming_period_years(2029, 2030), 1);
        assert_eq!(deeming_period_years(2030, 2030), 0);
        assert_eq!(deeming_period_years(2035, 2030), 0);
        assert_eq!(deeming_period_years(i32::MIN, 2030), u32::try_from(i32::MAX).unwrap_or(0));
    }

    #[test]
    fn past_horizon_yields_zero_certificates() {
        let result = calculator().calculate(10.0, SolarZone::Zone1, 2031).ok();
        assert_eq!(result.as_ref().map(|r| r.stc_count), Some(0));
        assert_eq!(result.as_ref().map(|r| r.stc_value), Some(0.0));
    }

    #[test]
    fn non_positive_size_rejected() {
        assert!(calculator().calculate(0.0, SolarZone::Zone3, 2025).is_err());
        assert!(calculator().calculate(-3.0, SolarZone::Zone3, 2025).is_err());
        assert!(
            calculator()
                .calculate(f64::NAN, SolarZone::Zone3, 2025)
                .is_err()
        );
    }

    #[test]
    fn unknown_zone_number_rejected() {
        let err = calculate_stcs(6.6, 9, 2025, &RebateConfig::default());
        assert_eq!(err, Err(ValidationError::UnknownZone(9)));
    }

    #[test]
    fn market_price_is_injected() {
        let cfg = RebateConfig {
            market_price_per_stc: 40.0,
            ..RebateConfig::default()
        };
        let result = calculate_stcs(6.6, 3, 2023, &cfg).ok();
        assert_eq!(result.map(|r| r.stc_value), Some(63.0 * 40.0));
    }

    #[test]
    fn unusable_reference_data_rejected() {
        let nan_price = StcCalculator::new(ZoneRatingTable::default(), f64::NAN, 2030);
        assert_eq!(
            nan_price.calculate(6.6, SolarZone::Zone3, 2023),
            Err(ValidationError::NotFinite {
                field: "rebate.market_price_per_stc"
            })
        );

        let mut cfg = RebateConfig::default();
        cfg.zone_ratings.zone_3 = 0.0;
        assert!(matches!(
            calculate_stcs(6.6, 3, 2023, &cfg),
            Err(ValidationError::NonPositive {
                field: "rebate.zone_ratings",
                ..
            })
        ));
        assert!(calculate_stcs(6.6, 2, 2023, &cfg).is_ok());
    }

    #[test]
    fn calculation_steps_are_recorded() {
        let result = calculator().calculate(6.6, SolarZone::Zone3, 2023).ok();
        let step4 = result.map(|r| r.calculation.step4).unwrap_or_default();
        assert!(step4.contains("63.85"), "unexpected step4: {step4}");
        assert!(step4.ends_with("63 STCs"));
    }

    #[test]
    fn battery_rebate_uses_usable_capacity() {
        let battery = BatterySpecification {
            model: "Test 10".to_string(),
            capacity_kwh: 10.0,
            voltage_v: 48.0,
        };
        // 10 * 0.9 * 330
        assert_eq!(
            estimate_battery_rebate(&battery, &RebateConfig::default()),
            Ok(2970.0)
        );
    }

    #[test]
    fn battery_rebate_rejects_empty_battery() {
        let battery = BatterySpecification {
            model: String::new(),
            capacity_kwh: 0.0,
            voltage_v: 48.0,
        };
        assert!(estimate_battery_rebate(&battery, &RebateConfig::default()).is_err());
    }

    #[test]
    fn battery_rebate_rejects_bad_usable_fraction() {
        let battery = BatterySpecification {
            model: "Test 10".to_string(),
            capacity_kwh: 10.0,
            voltage_v: 48.0,
        };
        let cfg = RebateConfig {
            battery_usable_fraction: 1.5,
            ..RebateConfig::default()
        };
        assert!(matches!(
            estimate_battery_rebate(&battery, &cfg),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
