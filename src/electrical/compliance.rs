//! DC/AC parameter derivation and code-compliance checks for a PV design.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{ArraySpecification, CableRuns, InverterSpecification, ProtectionFlags};
use crate::config::ElectricalConfig;
use crate::error::{ValidationError, ensure_non_negative, ensure_positive};

/// Derived electrical parameters and compliance verdicts for one design.
///
/// Recomputed on every call; nothing here has identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    /// Series string voltage (V).
    pub string_voltage_v: f64,
    /// Current of a single string (A).
    pub string_current_a: f64,
    /// Array voltage; strings are in parallel so this equals the string voltage (V).
    pub total_dc_voltage_v: f64,
    /// Sum of parallel string currents (A).
    pub total_dc_current_a: f64,
    pub total_dc_power_w: f64,
    pub ac_power_w: f64,
    pub ac_current_a: f64,
    /// DC voltage rise across outgoing and return conductors (V).
    pub voltage_rise_v: f64,
    pub voltage_rise_percent: f64,
    pub is_voltage_rise_compliant: bool,
    pub min_dc_cable_mm2: f64,
    pub min_ac_cable_mm2: f64,
    pub is_dc_cable_adequate: bool,
    pub is_ac_cable_adequate: bool,
    /// Voltage rise within limit and both cables adequately sized.
    pub is_compliant: bool,
    /// Human-readable fixes, in check order. Empty when nothing is flagged.
    pub recommendations: Vec<String>,
}

impl fmt::Display for ComplianceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tick = |ok: bool| if ok { "PASS" } else { "FAIL" };
        writeln!(f, "--- Electrical Compliance ---")?;
        writeln!(
            f,
            "String:                {:.1} V @ {:.1} A",
            self.string_voltage_v, self.string_current_a
        )?;
        writeln!(
            f,
            "DC array:              {:.1} V, {:.1} A, {:.2} kW",
            self.total_dc_voltage_v,
            self.total_dc_current_a,
            self.total_dc_power_w / 1000.0
        )?;
        writeln!(
            f,
            "AC output:             {:.1} A, {:.2} kW",
            self.ac_current_a,
            self.ac_power_w / 1000.0
        )?;
        writeln!(
            f,
            "DC voltage rise:       {:.2} V ({:.2}%) {}",
            self.voltage_rise_v,
            self.voltage_rise_percent,
            tick(self.is_voltage_rise_compliant)
        )?;
        writeln!(
            f,
            "DC cable minimum:      {:.1} mm² {}",
            self.min_dc_cable_mm2,
            tick(self.is_dc_cable_adequate)
        )?;
        writeln!(
            f,
            "AC cable minimum:      {:.1} mm² {}",
            self.min_ac_cable_mm2,
            tick(self.is_ac_cable_adequate)
        )?;
        write!(f, "Compliant:             {}", self.is_compliant)?;
        for (i, rec) in self.recommendations.iter().enumerate() {
            write!(f, "\n  {}. {rec}", i + 1)?;
        }
        Ok(())
    }
}

fn ensure_count(field: &'static str, value: u32) -> Result<f64, ValidationError> {
    if value == 0 {
        Err(ValidationError::NonPositive { field, value: 0.0 })
    } else {
        Ok(f64::from(value))
    }
}

/// Evaluates a design against the configured electrical limits.
///
/// Every recommendation check runs; a non-compliant design still yields a
/// complete result.
///
/// # Errors
///
/// Returns `ValidationError` for non-finite inputs, zero or negative sizes,
/// voltages and cable cross-sections, negative lengths or currents, and
/// phase counts other than 1 or 3. Limits that fail
/// [`ElectricalConfig::validate`] are rejected the same way.
pub fn evaluate_compliance(
    array: &ArraySpecification,
    inverter: &InverterSpecification,
    cables: &CableRuns,
    protection: &ProtectionFlags,
    limits: &ElectricalConfig,
) -> Result<ComplianceResult, ValidationError> {
    limits.validate()?;
    let system_size_kw = ensure_positive("array.system_size_kw", array.system_size_kw)?;
    let panel_voltage = ensure_positive("array.panel_voltage_v", array.panel_voltage_v)?;
    let panel_current = ensure_non_negative("array.panel_current_a", array.panel_current_a)?;
    let strings = ensure_count("array.strings_count", array.strings_count)?;
    let panels_per_string = ensure_count("array.panels_per_string", array.panels_per_string)?;

    let inverter_kw = ensure_positive("inverter.capacity_kw", inverter.capacity_kw)?;
    let inverter_v = ensure_positive("inverter.voltage_v", inverter.voltage_v)?;
    let phase_factor = match inverter.phases {
        1 => 1.0,
        3 => 3.0_f64.sqrt(),
        other => return Err(ValidationError::InvalidPhases(other)),
    };

    let dc_mm2 = ensure_positive("cables.dc.cross_section_mm2", cables.dc.cross_section_mm2)?;
    let dc_len = ensure_non_negative("cables.dc.length_meters", cables.dc.length_meters)?;
    let ac_mm2 = ensure_positive("cables.ac.cross_section_mm2", cables.ac.cross_section_mm2)?;
    let ac_len = ensure_non_negative("cables.ac.length_meters", cables.ac.length_meters)?;

    // DC side
    let string_voltage = panel_voltage * panels_per_string;
    let string_current = panel_current;
    let total_dc_current = string_current * strings;
    let total_dc_power_w = system_size_kw * 1000.0;

    // AC side
    let ac_power_w = inverter_kw * 1000.0;
    let ac_current = ac_power_w / (inverter_v * phase_factor);

    // Outgoing and return conductor
    let dc_resistance = (limits.copper_resistivity * dc_len) / dc_mm2;
    let voltage_rise_v = total_dc_current * dc_resistance * 2.0;
    let voltage_rise_percent = voltage_rise_v / string_voltage * 100.0;
    let is_voltage_rise_compliant = voltage_rise_percent <= limits.voltage_rise_limit_percent;

    let min_dc =
        (total_dc_current * limits.cable_safety_factor * dc_len) / limits.cable_sizing_divisor;
    let min_ac = (ac_current * limits.cable_safety_factor * ac_len) / limits.cable_sizing_divisor;
    let is_dc_cable_adequate = dc_mm2 >= min_dc;
    let is_ac_cable_adequate = ac_mm2 >= min_ac;

    let mut recommendations = Vec::new();
    if !is_voltage_rise_compliant {
        recommendations.push(format!(
            "Voltage rise {voltage_rise_percent:.2}% exceeds {}% limit. \
             Increase DC cable size or reduce cable length.",
            limits.voltage_rise_limit_percent
        ));
    }
    if !is_dc_cable_adequate {
        recommendations.push(format!(
            "DC cable size should be at least {min_dc:.1}mm². Current: {dc_mm2}mm²"
        ));
    }
    if !is_ac_cable_adequate {
        recommendations.push(format!(
            "AC cable size should be at least {min_ac:.1}mm². Current: {ac_mm2}mm²"
        ));
    }
    if system_size_kw > inverter_kw * limits.max_array_to_inverter_ratio {
        let oversize_pct = (system_size_kw / inverter_kw - 1.0) * 100.0;
        recommendations.push(format!(
            "System oversized by {oversize_pct:.0}%. Consider larger inverter."
        ));
    }
    if !protection.surge_protection_present {
        recommendations.push("Surge protection recommended for lightning protection.".to_string());
    }

    let is_compliant = is_voltage_rise_compliant && is_dc_cable_adequate && is_ac_cable_adequate;
    debug!(
        inverter = %inverter.model,
        voltage_rise_percent,
        min_dc,
        min_ac,
        is_compliant,
        flagged = recommendations.len(),
        "evaluated electrical compliance"
    );

    Ok(ComplianceResult {
        string_voltage_v: string_voltage,
        string_current_a: string_current,
        total_dc_voltage_v: string_voltage,
        total_dc_current_a: total_dc_current,
        total_dc_power_w,
        ac_power_w,
        ac_current_a: ac_current,
        voltage_rise_v,
        voltage_rise_percent,
        is_voltage_rise_compliant,
        min_dc_cable_mm2: min_dc,
        min_ac_cable_mm2: min_ac,
        is_dc_cable_adequate,
        is_ac_cable_adequate,
        is_compliant,
        recommendations,
    })
}
