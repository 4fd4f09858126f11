//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use solar_quote::config::QuoteConfig;
use solar_quote::electrical::{
    ArraySpecification, CableRuns, CableSpecification, InverterSpecification, ProtectionFlags,
};
use solar_quote::quote::{QuoteFinancials, QuoteInput};
use solar_quote::rebate::{EligibilityChecklist, SolarZone};

/// Built-in configuration (market price 38, horizon 2030).
pub fn default_config() -> QuoteConfig {
    QuoteConfig::standard()
}

/// 6.6 kW array: 2 strings of 10 × 330 W panels (40 V, 8.25 A).
pub fn default_array() -> ArraySpecification {
    ArraySpecification {
        system_size_kw: 6.6,
        panel_count: 20,
        panel_wattage: 330.0,
        panel_voltage_v: 40.0,
        panel_current_a: 8.25,
        strings_count: 2,
        panels_per_string: 10,
    }
}

/// 5 kW single-phase 230 V inverter.
pub fn default_inverter() -> InverterSpecification {
    InverterSpecification {
        model: "Generic 5kW".to_string(),
        capacity_kw: 5.0,
        phases: 1,
        voltage_v: 230.0,
    }
}

pub fn cable_runs(dc_mm2: f64, dc_len: f64, ac_mm2: f64, ac_len: f64) -> CableRuns {
    CableRuns {
        dc: CableSpecification {
            cross_section_mm2: dc_mm2,
            length_meters: dc_len,
        },
        ac: CableSpecification {
            cross_section_mm2: ac_mm2,
            length_meters: ac_len,
        },
    }
}

/// Runs short enough to pass every cable check with the default array.
pub fn short_runs() -> CableRuns {
    cable_runs(6.0, 2.0, 4.0, 1.0)
}

/// Reference cost 15000, savings 1800, feed-in 200.
pub fn default_financials() -> QuoteFinancials {
    QuoteFinancials {
        system_cost: 15000.0,
        annual_savings: 1800.0,
        feed_in_revenue: 200.0,
    }
}

/// Zone 3 install in 2023 with every document in place.
pub fn default_quote() -> QuoteInput {
    QuoteInput {
        customer: "Test Customer".to_string(),
        zone: SolarZone::Zone3,
        installation_year: 2023,
        array: default_array(),
        inverter: default_inverter(),
        battery: None,
        cables: short_runs(),
        protection: ProtectionFlags::all_present(),
        checklist: EligibilityChecklist::complete(),
        financials: default_financials(),
        projection: None,
    }
}
