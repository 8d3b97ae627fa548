//! Lease configuration from environment variables
//!
//! Variables override [`LeaseTerms::default`]; CLI flags override both.
//!   LEASE_START_DATE, LEASE_TERM_YEARS, LEASE_ANNUAL_CAP,
//!   LEASE_PENALTY_PER_UNIT, LEASE_START_ODOMETER, LEASE_READINGS_PATH

use super::LeaseTerms;
use crate::error::parse_date;
use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_START_DATE: &str = "LEASE_START_DATE";
pub const ENV_TERM_YEARS: &str = "LEASE_TERM_YEARS";
pub const ENV_ANNUAL_CAP: &str = "LEASE_ANNUAL_CAP";
pub const ENV_PENALTY_PER_UNIT: &str = "LEASE_PENALTY_PER_UNIT";
pub const ENV_START_ODOMETER: &str = "LEASE_START_ODOMETER";
pub const ENV_READINGS_PATH: &str = "LEASE_READINGS_PATH";

/// Default location of the readings file
pub const DEFAULT_READINGS_PATH: &str = "lease_readings.csv";

/// Load lease terms from the process environment
pub fn terms_from_env() -> LeaseTerms {
    terms_from_lookup(|key| env::var(key).ok())
}

/// Load lease terms using an arbitrary variable lookup
pub fn terms_from_lookup<F>(lookup: F) -> LeaseTerms
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = LeaseTerms::default();

    let start_date = lookup(ENV_START_DATE)
        .and_then(|raw| match parse_date(&raw) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("Ignoring {}: {}", ENV_START_DATE, e);
                None
            }
        })
        .unwrap_or(defaults.start_date);

    LeaseTerms {
        start_date,
        term_years: parse_var(&lookup, ENV_TERM_YEARS).unwrap_or(defaults.term_years),
        annual_cap: parse_var(&lookup, ENV_ANNUAL_CAP).unwrap_or(defaults.annual_cap),
        penalty_per_unit: parse_var(&lookup, ENV_PENALTY_PER_UNIT)
            .unwrap_or(defaults.penalty_per_unit),
        start_odometer: parse_var(&lookup, ENV_START_ODOMETER).unwrap_or(defaults.start_odometer),
    }
}

/// Readings file location from the environment, or the default
pub fn readings_path_from_env() -> PathBuf {
    env::var(ENV_READINGS_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_READINGS_PATH))
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}: cannot parse '{}'", key, raw);
            None
        }
    }
}
