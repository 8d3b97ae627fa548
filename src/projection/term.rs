//! Day-count arithmetic over a lease term

use crate::lease::LeaseConfig;
use chrono::NaiveDate;

/// Resolved term boundaries for a lease
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaseTerm {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Days in the term, counting both the start and end date
    pub total_days: u32,
}

impl LeaseTerm {
    pub fn from_config(config: &LeaseConfig) -> Self {
        let start_date = config.start_date();
        let end_date = config.end_date();
        let span = (end_date - start_date).num_days() + 1;

        Self {
            start_date,
            end_date,
            total_days: u32::try_from(span).unwrap_or(u32::MAX),
        }
    }

    /// Days of the term consumed through `as_of`, inclusive of `as_of`
    ///
    /// Zero before the start date, clamped to `total_days` after the end.
    pub fn elapsed_days(&self, as_of: NaiveDate) -> u32 {
        if as_of < self.start_date {
            return 0;
        }
        let elapsed = (as_of - self.start_date).num_days() + 1;
        u32::try_from(elapsed)
            .unwrap_or(u32::MAX)
            .min(self.total_days)
    }

    /// Days of the term left after `elapsed` days
    pub fn remaining_days(&self, elapsed: u32) -> u32 {
        self.total_days.saturating_sub(elapsed)
    }
}
