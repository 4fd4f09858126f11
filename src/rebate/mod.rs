//! STC rebate sizing, eligibility and the submission lifecycle.

/// Application-eligibility checklist.
pub mod eligibility;
/// Certificate count and value calculation.
pub mod stc;
pub mod submission;
/// Solar zones and their insolation ratings.
pub mod zone;

pub use eligibility::{EligibilityChecklist, EligibilityReport, validate_eligibility};
pub use stc::{
    StcCalculationSteps, StcCalculator, StcResult, calculate_stcs, deeming_period_years,
    estimate_battery_rebate,
};
pub use submission::{RebateSubmission, SubmissionStatus, validate_transition};
pub use zone::{SolarZone, ZoneRatingTable};
