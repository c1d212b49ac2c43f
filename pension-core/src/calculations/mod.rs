//! Pension projection logic.
//!
//! [`PensionProjection`] drives the per-scenario steps implemented in the
//! submodules: calendar arithmetic, contributions, income tax and rounding.

pub mod common;
pub mod contributions;
pub mod income_tax;
pub mod projection;
pub mod retirement;

pub use contributions::{care_contribution, church_tax, health_contribution};
pub use income_tax::IncomeTax;
pub use projection::{Baseline, PensionProjection, ProjectionError};
pub use retirement::{early_retirement_date, regular_retirement_date, retirement_start_year};
