//! Lease contract terms, odometer readings, and configuration loading

mod data;
pub mod loader;

pub use data::{
    sort_readings, LeaseConfig, LeaseTerms, Reading, WindowPolicy, DEFAULT_ANNUAL_CAP,
    DEFAULT_PENALTY_PER_UNIT, DEFAULT_TERM_YEARS,
};
pub use loader::{readings_path_from_env, terms_from_env};
