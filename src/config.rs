//! TOML-based reference data and calculation constants.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ValidationError, ensure_positive};
use crate::finance::ProjectionOptions;

/// Top-level configuration parsed from TOML.
///
/// Every section and field has a documented default. Load from TOML with
/// [`QuoteConfig::from_toml_file`] or use [`QuoteConfig::standard`] for the
/// built-in values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteConfig {
    /// STC pricing, zone ratings and the deeming horizon.
    #[serde(default)]
    pub rebate: RebateConfig,
    /// Electrical code limits and cable sizing constants.
    #[serde(default)]
    pub electrical: ElectricalConfig,
    /// Defaults for the 25-year financial projection.
    #[serde(default)]
    pub finance: ProjectionOptions,
    /// Installation margin and commission settings.
    #[serde(default)]
    pub pricing: PricingConfig,
}

/// Rebate reference data supplied by the caller rather than compiled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RebateConfig {
    /// Current market price of one STC, in quote currency units.
    pub market_price_per_stc: f64,
    /// Year the deeming scheme ends.
    pub deeming_horizon_year: i32,
    /// Federal battery rebate per usable kWh.
    pub battery_rebate_per_usable_kwh: f64,
    /// Fraction of nameplate battery capacity treated as usable (0.0–1.0).
    pub battery_usable_fraction: f64,
    /// Insolation per solar zone (kWh/kW/day).
    pub zone_ratings: ZoneRatingsConfig,
}

impl Default for RebateConfig {
    fn default() -> Self {
        Self {
            market_price_per_stc: 38.0,
            deeming_horizon_year: 2030,
            battery_rebate_per_usable_kwh: 330.0,
            battery_usable_fraction: 0.9,
            zone_ratings: ZoneRatingsConfig::default(),
        }
    }
}

/// Insolation figures for the four solar zones (kWh/kW/day).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoneRatingsConfig {
    pub zone_1: f64,
    pub zone_2: f64,
    pub zone_3: f64,
    pub zone_4: f64,
}

impl Default for ZoneRatingsConfig {
    fn default() -> Self {
        Self {
            zone_1: 1.622,
            zone_2: 1.536,
            zone_3: 1.382,
            zone_4: 1.185,
        }
    }
}

/// Electrical installation limits used by the compliance engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElectricalConfig {
    /// Maximum DC voltage rise as a percentage of string voltage.
    pub voltage_rise_limit_percent: f64,
    /// Maximum voltage rise of an AC sub-circuit (percent of supply voltage).
    pub ac_voltage_rise_limit_percent: f64,
    /// Copper resistivity approximation (Ω·mm²/m).
    pub copper_resistivity: f64,
    /// Current safety factor applied in minimum cable sizing.
    pub cable_safety_factor: f64,
    /// Divisor of the simplified ampacity sizing rule.
    pub cable_sizing_divisor: f64,
    /// Array-to-inverter ratio above which the inverter is flagged undersized.
    pub max_array_to_inverter_ratio: f64,
}

impl Default for ElectricalConfig {
    fn default() -> Self {
        Self {
            voltage_rise_limit_percent: 3.0,
            ac_voltage_rise_limit_percent: 3.0,
            copper_resistivity: 0.0175,
            cable_safety_factor: 1.25,
            cable_sizing_divisor: 7.0,
            max_array_to_inverter_ratio: 1.33,
        }
    }
}

impl ElectricalConfig {
    /// Checks every limit is a positive finite number.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive(
            "electrical.voltage_rise_limit_percent",
            self.voltage_rise_limit_percent,
        )?;
        ensure_positive(
            "electrical.ac_voltage_rise_limit_percent",
            self.ac_voltage_rise_limit_percent,
        )?;
        ensure_positive("electrical.copper_resistivity", self.copper_resistivity)?;
        ensure_positive("electrical.cable_safety_factor", self.cable_safety_factor)?;
        ensure_positive("electrical.cable_sizing_divisor", self.cable_sizing_divisor)?;
        ensure_positive(
            "electrical.max_array_to_inverter_ratio",
            self.max_array_to_inverter_ratio,
        )?;
        Ok(())
    }
}

/// Margin and commission settings for the quote orchestration layer.
///
/// None of the calculation components apply these; they are validated and
/// handed through untouched until the business settles which of them is
/// authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    /// Multiplier deriving wholesale cost from installation cost.
    pub installation_margin_multiplier: f64,
    /// Public-calculator commission (percent).
    pub commission_percent: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            installation_margin_multiplier: 0.7,
            commission_percent: 15.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"rebate.market_price_per_stc"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl QuoteConfig {
    /// Returns the built-in configuration.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut positive = |field: &str, value: f64| {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::new(field, format!("must be > 0, got {value}")));
            }
        };

        let r = &self.rebate;
        positive("rebate.market_price_per_stc", r.market_price_per_stc);
        positive(
            "rebate.battery_rebate_per_usable_kwh",
            r.battery_rebate_per_usable_kwh,
        );
        positive("rebate.zone_ratings.zone_1", r.zone_ratings.zone_1);
        positive("rebate.zone_ratings.zone_2", r.zone_ratings.zone_2);
        positive("rebate.zone_ratings.zone_3", r.zone_ratings.zone_3);
        positive("rebate.zone_ratings.zone_4", r.zone_ratings.zone_4);

        let e = &self.electrical;
        positive(
            "electrical.voltage_rise_limit_percent",
            e.voltage_rise_limit_percent,
        );
        positive(
            "electrical.ac_voltage_rise_limit_percent",
            e.ac_voltage_rise_limit_percent,
        );
        positive("electrical.copper_resistivity", e.copper_resistivity);
        positive("electrical.cable_safety_factor", e.cable_safety_factor);
        positive("electrical.cable_sizing_divisor", e.cable_sizing_divisor);
        positive(
            "electrical.max_array_to_inverter_ratio",
            e.max_array_to_inverter_ratio,
        );

        let p = &self.pricing;
        positive(
            "pricing.installation_margin_multiplier",
            p.installation_margin_multiplier,
        );

        if !(2000..=2100).contains(&r.deeming_horizon_year) {
            errors.push(ConfigError::new(
                "rebate.deeming_horizon_year",
                format!("must be in [2000, 2100], got {}", r.deeming_horizon_year),
            ));
        }
        if !(r.battery_usable_fraction > 0.0 && r.battery_usable_fraction <= 1.0) {
            errors.push(ConfigError::new(
                "rebate.battery_usable_fraction",
                "must be in (0.0, 1.0]",
            ));
        }
        if !(0.0..100.0).contains(&p.commission_percent) {
            errors.push(ConfigError::new(
                "pricing.commission_percent",
                "must be in [0.0, 100.0)",
            ));
        }
        if let Err(err) = self.finance.validate() {
            errors.push(ConfigError::new("finance", err.to_string()));
        }

        errors
    }
}
