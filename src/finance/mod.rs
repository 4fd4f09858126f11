//! Discounted cash-flow projection for a quoted installation.

pub mod projection;

pub use projection::{
    FinancialProjection, PROJECTION_YEARS, ProjectionOptions, YearProjection, project_financials,
};
