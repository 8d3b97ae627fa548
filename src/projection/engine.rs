//! Mileage projection calculator

use super::result::{ProjectionResult, UsagePoint};
use super::term::LeaseTerm;
use crate::lease::{sort_readings, LeaseConfig, Reading};
use chrono::NaiveDate;
use log::trace;

/// Fixed divisor for the daily allowance
///
/// Deliberately not the term's real day count: the daily cap stays the
/// same in leap years and across terms of different length.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Nominal per-day allowance for an annual cap
pub fn daily_cap(annual_cap: f64) -> f64 {
    annual_cap / DAYS_PER_YEAR
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Latest reading by date; among equal dates the later one in the sequence
pub fn latest_reading(readings: &[Reading]) -> Option<&Reading> {
    // max_by_key returns the last of several equal maxima
    readings.iter().max_by_key(|r| r.reading_date)
}

/// Project end-of-term mileage for a lease as of a given date
///
/// Pure and infallible: an empty reading series counts as zero distance
/// used, and zero elapsed or remaining days yield zero rates.
pub fn project(config: &LeaseConfig, readings: &[Reading], as_of: NaiveDate) -> ProjectionResult {
    let term = LeaseTerm::from_config(config);
    let elapsed_days = term.elapsed_days(as_of);
    let remaining_days = term.remaining_days(elapsed_days);
    let total_days = f64::from(term.total_days);

    let daily_cap = daily_cap(config.annual_cap());
    let allowed_to_date = f64::from(elapsed_days) * daily_cap;

    let current_odometer = latest_reading(readings).map(|r| r.odometer);
    let used_distance = current_odometer
        .map(|odometer| odometer.saturating_sub(config.start_odometer()))
        .unwrap_or(0);
    let used = used_distance as f64;

    let variance = used - allowed_to_date;
    let avg_per_day = if elapsed_days > 0 {
        used / f64::from(elapsed_days)
    } else {
        0.0
    };

    let projected_total = avg_per_day * total_days;
    let total_cap = daily_cap * total_days;
    let projected_overage = (projected_total - total_cap).max(0.0);
    let projected_penalty = projected_overage * config.penalty_per_unit();

    let needed_per_day = if remaining_days > 0 {
        (total_cap - used) / f64::from(remaining_days)
    } else {
        0.0
    };

    trace!(
        "project as_of={} elapsed={} remaining={} used={} readings={}",
        as_of,
        elapsed_days,
        remaining_days,
        used_distance,
        readings.len()
    );

    ProjectionResult {
        as_of,
        end_date: term.end_date,
        term_total_days: term.total_days,
        elapsed_days,
        remaining_days,
        daily_cap: round2(daily_cap),
        allowed_to_date: round2(allowed_to_date),
        current_odometer,
        used_distance,
        variance: round2(variance),
        avg_per_day: round2(avg_per_day),
        projected_total: round2(projected_total),
        total_cap: round2(total_cap),
        projected_overage: round2(projected_overage),
        projected_penalty: round2(projected_penalty),
        needed_per_day: round2(needed_per_day),
    }
}

/// Cumulative usage at each reading, ordered by date
pub fn usage_history(config: &LeaseConfig, readings: &[Reading]) -> Vec<UsagePoint> {
    let term = LeaseTerm::from_config(config);
    let daily_cap = daily_cap(config.annual_cap());

    let mut ordered = readings.to_vec();
    sort_readings(&mut ordered);

    ordered
        .iter()
        .map(|reading| {
            let allowed = f64::from(term.elapsed_days(reading.reading_date)) * daily_cap;
            let used_distance = reading.odometer.saturating_sub(config.start_odometer());
            UsagePoint {
                reading_id: reading.id,
                reading_date: reading.reading_date,
                odometer: reading.odometer,
                used_distance,
                allowed_at_date: round2(allowed),
                variance: round2(used_distance as f64 - allowed),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference_config() -> LeaseConfig {
        LeaseConfig::new(date(2025, 4, 20), 3, 20_000.0, 1.18, 0).unwrap()
    }

    #[test]
    fn test_second_day_reading() {
        let config = reference_config();
        let readings = [Reading::new(1, date(2025, 4, 21), 100)];
        let result = project(&config, &readings, date(2025, 4, 21));

        assert_eq!(result.elapsed_days, 2);
        assert_eq!(result.remaining_days, 1095);
        assert_abs_diff_eq!(result.daily_cap, 54.79);
        assert_abs_diff_eq!(result.allowed_to_date, 109.59);
        assert_eq!(result.current_odometer, Some(100));
        assert_eq!(result.used_distance, 100);
        assert_abs_diff_eq!(result.variance, -9.59);
        assert_abs_diff_eq!(result.avg_per_day, 50.0);
        assert_abs_diff_eq!(result.projected_total, 54_850.0);
        assert_eq!(result.projected_overage, 0.0);
        assert_eq!(result.projected_penalty, 0.0);
        assert!(!result.is_over_pace());
    }

    #[test]
    fn test_before_start_without_readings() {
        let config = reference_config();
        let result = project(&config, &[], date(2025, 1, 1));

        assert_eq!(result.elapsed_days, 0);
        assert_eq!(result.remaining_days, result.term_total_days);
        assert_eq!(result.allowed_to_date, 0.0);
        assert_eq!(result.used_distance, 0);
        assert_eq!(result.current_odometer, None);
        assert_eq!(result.cap_utilization(), 0.0);
        assert_eq!(result.avg_per_day, 0.0);
        assert_abs_diff_eq!(
            result.needed_per_day,
            result.total_cap / f64::from(result.term_total_days),
            epsilon = 0.01
        );
    }

    #[test]
    fn test_after_end_clamps() {
        let config = reference_config();
        let readings = [Reading::new(1, date(2028, 4, 1), 70_000)];
        let result = project(&config, &readings, date(2029, 6, 1));

        assert_eq!(result.elapsed_days, result.term_total_days);
        assert_eq!(result.remaining_days, 0);
        assert_eq!(result.needed_per_day, 0.0);
        assert!(result.projected_overage > 0.0);
        assert_abs_diff_eq!(
            result.projected_penalty,
            round2(result.projected_overage * 1.18),
            epsilon = 0.02
        );
    }

    #[test]
    fn test_empty_readings_use_nothing() {
        let config = reference_config();
        for as_of in [date(2020, 1, 1), date(2026, 7, 4), date(2035, 12, 31)] {
            let result = project(&config, &[], as_of);
            assert_eq!(result.used_distance, 0);
            assert!(result.projected_overage >= 0.0);
            assert!(result.projected_penalty >= 0.0);
        }
    }

    #[test]
    fn test_overage_projection() {
        // 100 days in, 10,000 used: 100/day over 1097 days
        let config = reference_config();
        let readings = [
            Reading::new(1, date(2025, 5, 1), 1_000),
            Reading::new(2, date(2025, 7, 28), 10_000),
        ];
        let result = project(&config, &readings, date(2025, 7, 28));

        assert_eq!(result.elapsed_days, 100);
        assert_abs_diff_eq!(result.avg_per_day, 100.0);
        assert_abs_diff_eq!(result.projected_total, 109_700.0);
        assert_abs_diff_eq!(result.total_cap, 60_109.59);
        assert_abs_diff_eq!(result.projected_overage, 49_590.41, epsilon = 0.01);
        assert_abs_diff_eq!(result.projected_penalty, 58_516.68, epsilon = 0.01);
        assert_abs_diff_eq!(result.cap_utilization(), 10_000.0 / 60_109.59);
        assert!(result.is_over_pace());
    }

    #[test]
    fn test_start_odometer_offsets_usage() {
        let config = LeaseConfig::new(date(2025, 4, 20), 3, 20_000.0, 1.18, 500).unwrap();
        let readings = [Reading::new(1, date(2025, 5, 1), 1_500)];
        let result = project(&config, &readings, date(2025, 5, 1));
        assert_eq!(result.used_distance, 1_000);

        // Readings below the starting odometer clamp to zero usage
        let readings = [Reading::new(1, date(2025, 5, 1), 200)];
        let result = project(&config, &readings, date(2025, 5, 1));
        assert_eq!(result.used_distance, 0);
        assert_eq!(result.current_odometer, Some(200));
    }

    #[test]
    fn test_latest_reading_by_date_then_position() {
        let readings = [
            Reading::new(1, date(2025, 6, 1), 3_000),
            Reading::new(2, date(2025, 5, 1), 9_000),
            Reading::new(3, date(2025, 6, 1), 3_100),
        ];
        assert_eq!(latest_reading(&readings).map(|r| r.id), Some(3));
        assert!(latest_reading(&[]).is_none());

        let result = project(&reference_config(), &readings, date(2025, 6, 1));
        assert_eq!(result.used_distance, 3_100);
    }

    #[test]
    fn test_project_is_idempotent() {
        let config = reference_config();
        let readings = vec![
            Reading::new(1, date(2025, 5, 1), 800),
            Reading::new(2, date(2025, 9, 1), 7_400),
        ];
        let snapshot = readings.clone();
        let first = project(&config, &readings, date(2025, 10, 1));
        let second = project(&config, &readings, date(2025, 10, 1));
        assert_eq!(first, second);
        assert_eq!(readings, snapshot);
    }

    #[test]
    fn test_usage_history_ordered() {
        let config = reference_config();
        let readings = [
            Reading::new(1, date(2025, 6, 1), 4_000),
            Reading::new(2, date(2025, 4, 21), 100),
        ];
        let history = usage_history(&config, &readings);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reading_id, 2);
        assert_abs_diff_eq!(history[0].allowed_at_date, 109.59);
        assert_abs_diff_eq!(history[0].variance, -9.59);
        assert_eq!(history[1].reading_id, 1);
        assert_eq!(history[1].used_distance, 4_000);
    }
}
