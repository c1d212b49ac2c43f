//! Net pension projections for early German statutory retirement.
//!
//! The [`calculations::PensionProjection`] turns a single [`UserInput`] into
//! one [`ScenarioResult`] per "months early" scenario. The [`store`] module
//! holds the abstraction used to keep the most recent calculation around.

pub mod calculations;
pub mod models;
pub mod store;

pub use calculations::{PensionProjection, ProjectionError};
pub use models::*;
pub use store::{CalculationStore, LastCalculation, StoreError};
