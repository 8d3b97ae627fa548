//! Lease Tracker - odometer logging and end-of-term mileage projection
//!
//! This library provides:
//! - Validated lease contract terms with calendar-year term arithmetic
//! - A pure projection of allowance, usage, pace, overage, and penalty
//! - Append-only reading stores (in-memory, CSV file) with a TTL read cache
//! - A tracker service applying a configurable reading window policy
//! - A bounded selection cursor for browsing ordered lists

pub mod error;
pub mod clock;
pub mod lease;
pub mod projection;
pub mod store;
pub mod tracker;
pub mod selection;

// Re-export commonly used types
pub use error::{LeaseError, Result};
pub use clock::{Clock, ManualClock, SystemClock};
pub use lease::{LeaseConfig, LeaseTerms, Reading, WindowPolicy};
pub use projection::{project, usage_history, ProjectionResult, UsagePoint};
pub use store::{CachedReadingStore, CsvReadingStore, MemoryReadingStore, ReadingStore};
pub use tracker::LeaseTracker;
pub use selection::Selection;
