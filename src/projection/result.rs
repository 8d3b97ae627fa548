//! Projection output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mileage position of a lease as of a given date
///
/// Distance rates and money amounts are rounded to two decimals; day
/// counts are exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Evaluation date
    pub as_of: NaiveDate,
    pub end_date: NaiveDate,
    pub term_total_days: u32,

    pub elapsed_days: u32,
    pub remaining_days: u32,

    /// Nominal allowance per day (annual cap over a 365-day year)
    pub daily_cap: f64,
    pub allowed_to_date: f64,

    /// Odometer of the latest reading, if any
    pub current_odometer: Option<u64>,
    pub used_distance: u64,

    /// Used minus allowed; positive means ahead of the allowance
    pub variance: f64,
    pub avg_per_day: f64,

    /// Distance at end of term if the average daily rate holds
    pub projected_total: f64,
    pub total_cap: f64,
    pub projected_overage: f64,
    pub projected_penalty: f64,

    /// Daily distance that would land exactly on the total cap
    pub needed_per_day: f64,
}

impl ProjectionResult {
    /// Whether usage to date exceeds the accrued allowance
    pub fn is_over_pace(&self) -> bool {
        self.variance > 0.0
    }

    /// Fraction of the total cap already used
    pub fn cap_utilization(&self) -> f64 {
        if self.total_cap > 0.0 {
            self.used_distance as f64 / self.total_cap
        } else {
            0.0
        }
    }
}

/// One point of the cumulative usage history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsagePoint {
    pub reading_id: u64,
    #[serde(rename = "date")]
    pub reading_date: NaiveDate,
    pub odometer: u64,
    pub used_distance: u64,

    /// Allowance accrued through the reading date
    pub allowed_at_date: f64,
    pub variance: f64,
}
