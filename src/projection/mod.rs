//! Mileage projection over a lease term

mod term;
mod engine;
mod result;

pub use term::LeaseTerm;
pub use engine::{daily_cap, latest_reading, project, round2, usage_history, DAYS_PER_YEAR};
pub use result::{ProjectionResult, UsagePoint};
