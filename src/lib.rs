//! Solar quote and compliance calculation core: STC rebates and the claim
//! lifecycle, single-line-diagram electrical compliance, and 25-year
//! financial projections.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// Cable sizing, voltage rise and protection checks.
pub mod electrical;
pub mod error;
pub mod finance;
pub mod io;
pub mod quote;
/// STC entitlement, eligibility and the rebate submission lifecycle.
pub mod rebate;
