//! Lease tracker service
//!
//! Ties a lease configuration to a reading store and a clock, applying
//! the reading window policy on submission.

use crate::clock::Clock;
use crate::error::{LeaseError, Result};
use crate::lease::{LeaseConfig, Reading, WindowPolicy};
use crate::projection::{latest_reading, project, usage_history, ProjectionResult, UsagePoint};
use crate::store::ReadingStore;
use chrono::NaiveDate;
use log::{info, warn};

/// Tracker for a single lease
///
/// # Example
/// ```ignore
/// let mut tracker = LeaseTracker::new(config, MemoryReadingStore::new(), SystemClock);
/// tracker.record(today, 12_400)?;
/// let status = tracker.status()?;
/// ```
#[derive(Debug)]
pub struct LeaseTracker<S, C> {
    config: LeaseConfig,
    store: S,
    clock: C,
    policy: WindowPolicy,
}

impl<S: ReadingStore, C: Clock> LeaseTracker<S, C> {
    pub fn new(config: LeaseConfig, store: S, clock: C) -> Self {
        Self {
            config,
            store,
            clock,
            policy: WindowPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &LeaseConfig {
        &self.config
    }

    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Submit a new odometer reading
    pub fn record(&mut self, reading_date: NaiveDate, odometer: u64) -> Result<Reading> {
        if !self.config.covers(reading_date) {
            match self.policy {
                WindowPolicy::Accept => {}
                WindowPolicy::Warn => warn!(
                    "Reading dated {} is outside the lease term {}..={}",
                    reading_date,
                    self.config.start_date(),
                    self.config.end_date()
                ),
                WindowPolicy::Reject => {
                    return Err(LeaseError::ReadingOutsideTerm {
                        date: reading_date,
                        start: self.config.start_date(),
                        end: self.config.end_date(),
                    })
                }
            }
        }

        let existing = self.store.list_all()?;
        if let Some(previous) = latest_reading(&existing) {
            if reading_date >= previous.reading_date && odometer < previous.odometer {
                warn!(
                    "Odometer {} is lower than the previous reading {} on {}",
                    odometer, previous.odometer, previous.reading_date
                );
            }
        }

        let reading = self.store.append(reading_date, odometer)?;
        info!(
            "Recorded reading {}: {} on {}",
            reading.id, reading.odometer, reading.reading_date
        );
        Ok(reading)
    }

    /// All readings ordered by date
    pub fn readings(&self) -> Result<Vec<Reading>> {
        self.store.list_all()
    }

    /// Projection as of today
    pub fn status(&self) -> Result<ProjectionResult> {
        self.status_as_of(self.clock.today())
    }

    pub fn status_as_of(&self, as_of: NaiveDate) -> Result<ProjectionResult> {
        let readings = self.store.list_all()?;
        Ok(project(&self.config, &readings, as_of))
    }

    /// Cumulative usage at each reading
    pub fn history(&self) -> Result<Vec<UsagePoint>> {
        let readings = self.store.list_all()?;
        Ok(usage_history(&self.config, &readings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryReadingStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tracker(policy: WindowPolicy) -> LeaseTracker<MemoryReadingStore, ManualClock> {
        let config = LeaseConfig::new(date(2025, 4, 20), 3, 20_000.0, 1.18, 0).unwrap();
        LeaseTracker::new(
            config,
            MemoryReadingStore::new(),
            ManualClock::at_date(date(2025, 4, 21)),
        )
        .with_policy(policy)
    }

    #[test]
    fn test_status_uses_clock() {
        let mut tracker = tracker(WindowPolicy::Accept);
        tracker.record(date(2025, 4, 21), 100).unwrap();

        let status = tracker.status().unwrap();
        assert_eq!(status.as_of, date(2025, 4, 21));
        assert_eq!(status.elapsed_days, 2);
        assert_eq!(status.used_distance, 100);
    }

    #[test]
    fn test_accept_policy_stores_out_of_term_reading() {
        let mut tracker = tracker(WindowPolicy::Accept);
        tracker.record(date(2025, 1, 1), 50).unwrap();
        assert_eq!(tracker.readings().unwrap().len(), 1);
    }

    #[test]
    fn test_warn_policy_stores_out_of_term_reading() {
        let mut tracker = tracker(WindowPolicy::Warn);
        tracker.record(date(2030, 1, 1), 50).unwrap();
        assert_eq!(tracker.readings().unwrap().len(), 1);
    }

    #[test]
    fn test_reject_policy_leaves_store_untouched() {
        let mut tracker = tracker(WindowPolicy::Reject);
        assert_eq!(tracker.policy(), WindowPolicy::Reject);
        let err = tracker.record(date(2025, 4, 19), 50).unwrap_err();
        assert!(matches!(err, LeaseError::ReadingOutsideTerm { .. }));
        assert!(tracker.readings().unwrap().is_empty());

        // Boundaries are inside the term
        tracker.record(date(2025, 4, 20), 0).unwrap();
        tracker.record(date(2028, 4, 20), 60_000).unwrap();
        assert_eq!(tracker.readings().unwrap().len(), 2);
    }

    #[test]
    fn test_decreasing_odometer_is_accepted() {
        let mut tracker = tracker(WindowPolicy::Accept);
        tracker.record(date(2025, 5, 1), 1_000).unwrap();
        tracker.record(date(2025, 5, 2), 900).unwrap();

        let status = tracker.status_as_of(date(2025, 5, 2)).unwrap();
        assert_eq!(status.used_distance, 900);
    }

    #[test]
    fn test_history_follows_store() {
        let mut tracker = tracker(WindowPolicy::Accept);
        tracker.record(date(2025, 6, 1), 3_000).unwrap();
        tracker.record(date(2025, 5, 1), 1_500).unwrap();

        let history = tracker.history().unwrap();
        let odometers: Vec<u64> = history.iter().map(|p| p.odometer).collect();
        assert_eq!(odometers, vec![1_500, 3_000]);
    }
}
