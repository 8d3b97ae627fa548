//! Lease contract terms and odometer readings

use crate::error::{LeaseError, Result};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default contract start used when nothing else is configured
pub const DEFAULT_START_DATE: (i32, u32, u32) = (2025, 4, 20);
pub const DEFAULT_TERM_YEARS: u32 = 3;
pub const DEFAULT_ANNUAL_CAP: f64 = 20_000.0;
pub const DEFAULT_PENALTY_PER_UNIT: f64 = 1.18;

/// Raw contract terms as read from configuration, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseTerms {
    pub start_date: NaiveDate,
    pub term_years: u32,
    pub annual_cap: f64,
    pub penalty_per_unit: f64,
    #[serde(default)]
    pub start_odometer: u64,
}

/// Validated lease contract
///
/// Fields are private so that a `LeaseConfig` always has a computable
/// end date; build one with [`LeaseConfig::new`] or from [`LeaseTerms`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LeaseTerms", into = "LeaseTerms")]
pub struct LeaseConfig {
    start_date: NaiveDate,
    term_years: u32,
    annual_cap: f64,
    penalty_per_unit: f64,
    start_odometer: u64,
    end_date: NaiveDate,
}

impl LeaseConfig {
    /// Validate contract terms and resolve the end date
    pub fn new(
        start_date: NaiveDate,
        term_years: u32,
        annual_cap: f64,
        penalty_per_unit: f64,
        start_odometer: u64,
    ) -> Result<Self> {
        if term_years == 0 {
            return Err(LeaseError::InvalidConfig(
                "term_years must be at least 1".to_string(),
            ));
        }
        if !annual_cap.is_finite() || annual_cap <= 0.0 {
            return Err(LeaseError::InvalidConfig(format!(
                "annual_cap must be positive, got {}",
                annual_cap
            )));
        }
        if !penalty_per_unit.is_finite() || penalty_per_unit < 0.0 {
            return Err(LeaseError::InvalidConfig(format!(
                "penalty_per_unit must be non-negative, got {}",
                penalty_per_unit
            )));
        }

        let end_date = add_years(start_date, term_years).ok_or(LeaseError::TermOverflow {
            start: start_date,
            years: term_years,
        })?;

        Ok(Self {
            start_date,
            term_years,
            annual_cap,
            penalty_per_unit,
            start_odometer,
            end_date,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn annual_cap(&self) -> f64 {
        self.annual_cap
    }

    pub fn penalty_per_unit(&self) -> f64 {
        self.penalty_per_unit
    }

    pub fn start_odometer(&self) -> u64 {
        self.start_odometer
    }

    /// Contract end: start plus whole calendar years
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Whether a date falls within `[start_date, end_date]`
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn terms(&self) -> LeaseTerms {
        LeaseTerms {
            start_date: self.start_date,
            term_years: self.term_years,
            annual_cap: self.annual_cap,
            penalty_per_unit: self.penalty_per_unit,
            start_odometer: self.start_odometer,
        }
    }
}

impl Default for LeaseTerms {
    fn default() -> Self {
        let (y, m, d) = DEFAULT_START_DATE;
        Self {
            start_date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            term_years: DEFAULT_TERM_YEARS,
            annual_cap: DEFAULT_ANNUAL_CAP,
            penalty_per_unit: DEFAULT_PENALTY_PER_UNIT,
            start_odometer: 0,
        }
    }
}

impl TryFrom<LeaseTerms> for LeaseConfig {
    type Error = LeaseError;

    fn try_from(terms: LeaseTerms) -> Result<Self> {
        LeaseConfig::new(
            terms.start_date,
            terms.term_years,
            terms.annual_cap,
            terms.penalty_per_unit,
            terms.start_odometer,
        )
    }
}

impl From<LeaseConfig> for LeaseTerms {
    fn from(config: LeaseConfig) -> Self {
        config.terms()
    }
}

/// Calendar-year addition; Feb 29 lands on Feb 28 in non-leap years
fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    let months = years.checked_mul(12)?;
    date.checked_add_months(Months::new(months))
}

/// A single odometer reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Store-assigned, monotonically increasing identifier
    pub id: u64,

    #[serde(rename = "date")]
    pub reading_date: NaiveDate,

    pub odometer: u64,
}

impl Reading {
    pub fn new(id: u64, reading_date: NaiveDate, odometer: u64) -> Self {
        Self {
            id,
            reading_date,
            odometer,
        }
    }
}

/// Sort readings by date, keeping insertion order among equal dates
pub fn sort_readings(readings: &mut [Reading]) {
    readings.sort_by_key(|r| (r.reading_date, r.id));
}

/// How readings dated outside the lease term are treated on submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// Store without comment
    #[default]
    Accept,
    /// Store, but log a warning
    Warn,
    /// Refuse the reading
    Reject,
}

impl FromStr for WindowPolicy {
    type Err = LeaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "accept" => Ok(WindowPolicy::Accept),
            "warn" => Ok(WindowPolicy::Warn),
            "reject" => Ok(WindowPolicy::Reject),
            other => Err(LeaseError::InvalidConfig(format!(
                "unknown window policy: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowPolicy::Accept => "accept",
            WindowPolicy::Warn => "warn",
            WindowPolicy::Reject => "reject",
        };
        f.write_str(name)
    }
}
