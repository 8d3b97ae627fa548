//! Short-lived read cache in front of a reading store
//!
//! A single cached snapshot of `list_all`, reused until its time-to-live
//! runs out or a write goes through the cache.

use super::ReadingStore;
use crate::clock::Clock;
use crate::error::Result;
use crate::lease::Reading;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::debug;
use std::cell::{Cell, RefCell};

/// Default snapshot lifetime
pub const DEFAULT_CACHE_TTL_SECS: i64 = 60;

/// Counters for cache effectiveness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    loaded_at: NaiveDateTime,
    readings: Vec<Reading>,
}

/// Caching wrapper around any [`ReadingStore`]
///
/// Not `Sync`; writes made to the inner store behind the cache's back
/// are only seen once the snapshot expires.
#[derive(Debug)]
pub struct CachedReadingStore<S, C> {
    inner: S,
    clock: C,
    ttl: Duration,
    snapshot: RefCell<Option<Snapshot>>,
    stats: Cell<CacheStats>,
}

impl<S: ReadingStore, C: Clock> CachedReadingStore<S, C> {
    pub fn new(inner: S, clock: C) -> Self {
        Self::with_ttl(inner, clock, Duration::seconds(DEFAULT_CACHE_TTL_SECS))
    }

    pub fn with_ttl(inner: S, clock: C, ttl: Duration) -> Self {
        Self {
            inner,
            clock,
            ttl,
            snapshot: RefCell::new(None),
            stats: Cell::new(CacheStats::default()),
        }
    }

    /// Drop the cached snapshot
    pub fn invalidate(&self) {
        if self.snapshot.borrow_mut().take().is_some() {
            let mut stats = self.stats.get();
            stats.invalidations += 1;
            self.stats.set(stats);
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.get()
    }

    fn is_fresh(&self, snapshot: &Snapshot, now: NaiveDateTime) -> bool {
        now >= snapshot.loaded_at && now - snapshot.loaded_at < self.ttl
    }

    fn record(&self, hit: bool) {
        let mut stats = self.stats.get();
        if hit {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        self.stats.set(stats);
    }
}

impl<S: ReadingStore, C: Clock> ReadingStore for CachedReadingStore<S, C> {
    fn append(&mut self, reading_date: NaiveDate, odometer: u64) -> Result<Reading> {
        let reading = self.inner.append(reading_date, odometer)?;
        self.invalidate();
        Ok(reading)
    }

    fn list_all(&self) -> Result<Vec<Reading>> {
        let now = self.clock.now();

        if let Some(snapshot) = self.snapshot.borrow().as_ref() {
            if self.is_fresh(snapshot, now) {
                self.record(true);
                return Ok(snapshot.readings.clone());
            }
        }

        self.record(false);
        let readings = self.inner.list_all()?;
        debug!("Reading cache refreshed ({} readings)", readings.len());
        *self.snapshot.borrow_mut() = Some(Snapshot {
            loaded_at: now,
            readings: readings.clone(),
        });

        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryReadingStore;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn seeded_store() -> MemoryReadingStore {
        let mut store = MemoryReadingStore::new();
        store.append(date(1), 1_000).unwrap();
        store
    }

    #[test]
    fn test_hit_within_ttl() {
        let clock = ManualClock::at_date(date(1));
        let cache = CachedReadingStore::new(seeded_store(), &clock);

        assert_eq!(cache.list_all().unwrap().len(), 1);
        clock.advance(Duration::seconds(30));
        assert_eq!(cache.list_all().unwrap().len(), 1);

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert!((stats.hit_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_miss_after_ttl() {
        let clock = ManualClock::at_date(date(1));
        let cache = CachedReadingStore::with_ttl(seeded_store(), &clock, Duration::seconds(10));

        cache.list_all().unwrap();
        clock.advance(Duration::seconds(10));
        cache.list_all().unwrap();

        assert_eq!(cache.stats().misses, 2);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_append_invalidates() {
        let clock = ManualClock::at_date(date(1));
        let mut cache = CachedReadingStore::new(seeded_store(), &clock);

        assert_eq!(cache.list_all().unwrap().len(), 1);
        cache.append(date(2), 1_200).unwrap();
        let readings = cache.list_all().unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].odometer, 1_200);
        assert_eq!(cache.stats().invalidations, 1);
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_clock_moving_backwards_refreshes() {
        let clock = ManualClock::at_date(date(2));
        let cache = CachedReadingStore::new(seeded_store(), &clock);

        cache.list_all().unwrap();
        clock.set(date(1).and_hms_opt(12, 0, 0).unwrap());
        cache.list_all().unwrap();
        assert_eq!(cache.stats().misses, 2);
    }
}
