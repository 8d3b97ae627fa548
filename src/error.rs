//! Error types shared across the lease tracker

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while configuring a lease or persisting readings
///
/// The projection calculator itself never fails; everything here comes
/// from configuration, validation policy, or storage.
#[derive(Debug, Error)]
pub enum LeaseError {
    #[error("invalid lease configuration: {0}")]
    InvalidConfig(String),

    #[error("lease starting {start} cannot run for {years} years")]
    TermOverflow { start: NaiveDate, years: u32 },

    #[error("reading dated {date} falls outside the lease term {start}..={end}")]
    ReadingOutsideTerm {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LeaseError>;

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| LeaseError::InvalidDate(value.to_string()))
}
