//! Single-line-diagram electrical calculations.

/// Standard cable table and AC voltage-rise calculator.
pub mod cable;
pub mod compliance;
pub mod types;

pub use cable::{AcCircuit, AcVoltageRise, PhaseType, ac_voltage_rise};
pub use compliance::{ComplianceResult, evaluate_compliance};
pub use types::{
    ArraySpecification, BatterySpecification, CableRuns, CableSpecification,
    InverterSpecification, ProtectionFlags,
};
