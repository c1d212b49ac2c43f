mod federal_state;
mod income_tax_schedule;
mod parameters;
mod scenario_result;
mod taxable_portion;
mod user_input;

pub use federal_state::FederalState;
pub use income_tax_schedule::IncomeTaxSchedule;
pub use parameters::{ParameterError, PensionParameters};
pub use scenario_result::{BreakEvenAge, ScenarioResult};
pub use taxable_portion::{TaxablePortion, TaxablePortionTable};
pub use user_input::UserInput;
