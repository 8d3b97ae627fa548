//! Persistence for odometer readings
//!
//! Stores are append-only: readings are never updated or removed once
//! written, and `list_all` returns them ordered by date then id.

mod memory;
mod csv_file;
mod cache;

pub use memory::MemoryReadingStore;
pub use csv_file::CsvReadingStore;
pub use cache::{CacheStats, CachedReadingStore, DEFAULT_CACHE_TTL_SECS};

use crate::error::Result;
use crate::lease::Reading;
use chrono::NaiveDate;

/// Append-only ordered collection of readings
pub trait ReadingStore {
    /// Record a reading, assigning it the next id
    fn append(&mut self, reading_date: NaiveDate, odometer: u64) -> Result<Reading>;

    /// All readings ordered by date, ties in insertion order
    fn list_all(&self) -> Result<Vec<Reading>>;
}

impl<S: ReadingStore + ?Sized> ReadingStore for Box<S> {
    fn append(&mut self, reading_date: NaiveDate, odometer: u64) -> Result<Reading> {
        (**self).append(reading_date, odometer)
    }

    fn list_all(&self) -> Result<Vec<Reading>> {
        (**self).list_all()
    }
}
