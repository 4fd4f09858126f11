//! Standard copper cable table and the AC sub-circuit voltage-rise check.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ElectricalConfig;
use crate::error::{ValidationError, ensure_non_negative, ensure_positive};

/// One row of the cable table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CableRating {
    pub size_mm2: f64,
    /// Conductor resistance at 75 °C (Ω/km).
    pub resistance_ohm_per_km: f64,
    /// Current-carrying capacity (A).
    pub max_current_a: f64,
}

const fn rating(size_mm2: f64, resistance_ohm_per_km: f64, max_current_a: f64) -> CableRating {
    CableRating {
        size_mm2,
        resistance_ohm_per_km,
        max_current_a,
    }
}

/// Standard sizes, ascending.
pub const STANDARD_CABLES: [CableRating; 12] = [
    rating(1.5, 16.1, 16.0),
    rating(2.5, 9.61, 24.0),
    rating(4.0, 6.0, 32.0),
    rating(6.0, 4.0, 41.0),
    rating(10.0, 2.4, 57.0),
    rating(16.0, 1.5, 76.0),
    rating(25.0, 0.96, 101.0),
    rating(35.0, 0.69, 125.0),
    rating(50.0, 0.49, 151.0),
    rating(70.0, 0.35, 192.0),
    rating(95.0, 0.25, 232.0),
    rating(120.0, 0.20, 269.0),
];

/// Looks up a standard cable size.
///
/// # Errors
///
/// Returns `ValidationError::UnknownCableSize` if `size_mm2` is not in the table.
pub fn standard_cable(size_mm2: f64) -> Result<CableRating, ValidationError> {
    STANDARD_CABLES
        .iter()
        .copied()
        .find(|c| c.size_mm2 == size_mm2)
        .ok_or(ValidationError::UnknownCableSize(size_mm2))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseType {
    Single,
    Three,
}

/// An AC circuit to check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcCircuit {
    /// Nominal supply voltage (V).
    pub voltage_v: f64,
    /// Load current (A).
    pub current_a: f64,
    /// One-way run length (m).
    pub length_meters: f64,
    /// Standard cable size (mm²).
    pub cable_size_mm2: f64,
    pub power_factor: f64,
    pub phase_type: PhaseType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcVoltageRise {
    pub voltage_rise_v: f64,
    pub voltage_rise_percent: f64,
    pub is_compliant: bool,
    /// Current as a share of the cable's rating (percent).
    pub current_utilisation_percent: f64,
    /// Smallest standard cable within both the rise limit and its current
    /// rating. Only set when the chosen cable fails; `None` there means no
    /// standard size is sufficient.
    pub recommended_size_mm2: Option<f64>,
}

fn rise_volts(circuit: &AcCircuit, cable: &CableRating, length_km: f64) -> f64 {
    let resistance = cable.resistance_ohm_per_km * length_km;
    let conductor_factor = match circuit.phase_type {
        PhaseType::Single => 2.0,
        PhaseType::Three => 3.0_f64.sqrt(),
    };
    conductor_factor * circuit.current_a * resistance * circuit.power_factor
}

/// Voltage rise of an AC circuit on a standard cable, checked against
/// `limits.ac_voltage_rise_limit_percent`.
///
/// # Errors
///
/// Returns `ValidationError` for non-positive voltage, negative current or
/// length, a power factor outside `(0, 1]`, a non-standard cable size, or a
/// non-positive limit.
pub fn ac_voltage_rise(
    circuit: &AcCircuit,
    limits: &ElectricalConfig,
) -> Result<AcVoltageRise, ValidationError> {
    let limit = ensure_positive(
        "electrical.ac_voltage_rise_limit_percent",
        limits.ac_voltage_rise_limit_percent,
    )?;
    let voltage = ensure_positive("voltage_v", circuit.voltage_v)?;
    let current = ensure_non_negative("current_a", circuit.current_a)?;
    let length_km = ensure_non_negative("length_meters", circuit.length_meters)? / 1000.0;
    let pf = ensure_positive("power_factor", circuit.power_factor)?;
    if pf > 1.0 {
        return Err(ValidationError::OutOfRange {
            field: "power_factor",
            expected: "in (0, 1]",
            value: pf,
        });
    }
    let cable = standard_cable(circuit.cable_size_mm2)?;

    let percent_of = |rise: f64| rise / voltage * 100.0;
    let voltage_rise_v = rise_volts(circuit, &cable, length_km);
    let voltage_rise_percent = percent_of(voltage_rise_v);
    let is_compliant = voltage_rise_percent <= limit;

    let recommended_size_mm2 = if is_compliant {
        None
    } else {
        STANDARD_CABLES
            .iter()
            .find(|c| {
                percent_of(rise_volts(circuit, c, length_km)) <= limit
                    && c.max_current_a >= current
            })
            .map(|c| c.size_mm2)
    };

    debug!(
        voltage_rise_percent,
        cable_size_mm2 = cable.size_mm2,
        ?recommended_size_mm2,
        "calculated AC voltage rise"
    );

    Ok(AcVoltageRise {
        voltage_rise_v,
        voltage_rise_percent,
        is_compliant,
        current_utilisation_percent: current / cable.max_current_a * 100.0,
        recommended_size_mm2,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn limits() -> ElectricalConfig {
        ElectricalConfig::default()
    }

    fn circuit() -> AcCircuit {
        AcCircuit {
            voltage_v: 230.0,
            current_a: 20.0,
            length_meters: 20.0,
            cable_size_mm2: 4.0,
            power_factor: 1.0,
            phase_type: PhaseType::Single,
        }
    }

    #[test]
    fn single_phase_rise() {
        // 2 * 20 A * (6.0 Ω/km * 0.02 km) = 4.8 V
        let r = ac_voltage_rise(&circuit(), &limits()).unwrap_or_else(|e| panic!("{e}"));
        assert_relative_eq!(r.voltage_rise_v, 4.8, epsilon = 1e-12);
        assert_relative_eq!(r.voltage_rise_percent, 4.8 / 230.0 * 100.0, epsilon = 1e-12);
        assert!(r.is_compliant);
        assert_eq!(r.recommended_size_mm2, None);
        assert_relative_eq!(r.current_utilisation_percent, 62.5);
    }

    #[test]
    fn three_phase_uses_root_three() {
        let c = AcCircuit {
            voltage_v: 400.0,
            phase_type: PhaseType::Three,
            ..circuit()
        };
        let r = ac_voltage_rise(&c, &limits()).unwrap_or_else(|e| panic!("{e}"));
        assert_relative_eq!(r.voltage_rise_v, 3.0_f64.sqrt() * 20.0 * 0.12, epsilon = 1e-12);
    }

    #[test]
    fn long_run_recommends_next_adequate_size() {
        // 50 m on 4 mm²: 2 * 20 * 0.3 = 12 V (5.2%)
        // 6 mm²: 2 * 20 * 0.2 = 8 V (3.48%), 10 mm²: 4.8 V (2.09%)
        let c = AcCircuit {
            length_meters: 50.0,
            ..circuit()
        };
        let r = ac_voltage_rise(&c, &limits()).unwrap_or_else(|e| panic!("{e}"));
        assert!(!r.is_compliant);
        assert_eq!(r.recommended_size_mm2, Some(10.0));
    }

    #[test]
    fn configured_limit_replaces_default() {
        // 4.8 V on 230 V is 2.09%
        let strict = ElectricalConfig {
            ac_voltage_rise_limit_percent: 2.0,
            ..ElectricalConfig::default()
        };
        let r = ac_voltage_rise(&circuit(), &strict).unwrap_or_else(|e| panic!("{e}"));
        assert!(!r.is_compliant);
        assert_eq!(r.recommended_size_mm2, Some(6.0));

        let zero = ElectricalConfig {
            ac_voltage_rise_limit_percent: 0.0,
            ..ElectricalConfig::default()
        };
        assert!(matches!(
            ac_voltage_rise(&circuit(), &zero),
            Err(ValidationError::NonPositive { .. })
        ));
    }

    #[test]
    fn no_standard_size_sufficient() {
        let c = AcCircuit {
            current_a: 400.0,
            length_meters: 200.0,
            ..circuit()
        };
        let r = ac_voltage_rise(&c, &limits()).unwrap_or_else(|e| panic!("{e}"));
        assert!(!r.is_compliant);
        assert_eq!(r.recommended_size_mm2, None);
    }

    #[test]
    fn non_standard_size_rejected() {
        let c = AcCircuit {
            cable_size_mm2: 5.0,
            ..circuit()
        };
        assert_eq!(
            ac_voltage_rise(&c, &limits()),
            Err(ValidationError::UnknownCableSize(5.0))
        );
    }

    #[test]
    fn power_factor_above_one_rejected() {
        let c = AcCircuit {
            power_factor: 1.2,
            ..circuit()
        };
        assert!(matches!(
            ac_voltage_rise(&c, &limits()),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn table_is_ascending() {
        for pair in STANDARD_CABLES.windows(2) {
            assert!(pair[0].size_mm2 < pair[1].size_mm2);
            assert!(pair[0].resistance_ohm_per_km > pair[1].resistance_ohm_per_km);
            assert!(pair[0].max_current_a < pair[1].max_current_a);
        }
    }
}
