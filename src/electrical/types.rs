//! Installation design inputs consumed by the compliance engine.

use serde::{Deserialize, Serialize};

/// PV array layout. `panel_count == strings_count * panels_per_string` is the
/// caller's responsibility; each field is used independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArraySpecification {
    /// DC nameplate size (kW).
    pub system_size_kw: f64,
    pub panel_count: u32,
    /// Panel rated power (W).
    pub panel_wattage: f64,
    /// Panel operating voltage (V).
    pub panel_voltage_v: f64,
    /// Panel operating current (A).
    pub panel_current_a: f64,
    /// Parallel strings.
    pub strings_count: u32,
    /// Series panels per string.
    pub panels_per_string: u32,
}

/// Grid-tie inverter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverterSpecification {
    pub model: String,
    /// AC rated output (kW).
    pub capacity_kw: f64,
    /// 1 or 3.
    pub phases: u8,
    /// AC output voltage (V).
    pub voltage_v: f64,
}

/// Optional storage battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterySpecification {
    pub model: String,
    pub capacity_kwh: f64,
    pub voltage_v: f64,
}

/// One cable run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CableSpecification {
    /// Conductor cross-section (mm²).
    pub cross_section_mm2: f64,
    /// One-way run length (m).
    pub length_meters: f64,
}

/// DC (array to inverter) and AC (inverter to switchboard) runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CableRuns {
    pub dc: CableSpecification,
    pub ac: CableSpecification,
}

/// Protection devices present in the design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionFlags {
    pub dc_isolator_present: bool,
    pub ac_isolator_present: bool,
    pub surge_protection_present: bool,
    pub earthing_present: bool,
}

impl ProtectionFlags {
    /// Every device fitted.
    pub fn all_present() -> Self {
        Self {
            dc_isolator_present: true,
            ac_isolator_present: true,
            surge_protection_present: true,
            earthing_present: true,
        }
    }
}
