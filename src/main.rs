//! Lease Tracker CLI
//!
//! Record odometer readings and project end-of-term mileage for a lease.
//! Lease terms come from defaults, then LEASE_* environment variables,
//! then command-line flags.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use lease_tracker::lease::{readings_path_from_env, terms_from_env};
use lease_tracker::{
    CachedReadingStore, Clock, CsvReadingStore, LeaseConfig, LeaseTracker, ProjectionResult,
    Selection, SystemClock, WindowPolicy,
};
use log::debug;
use std::path::PathBuf;

type Tracker = LeaseTracker<CachedReadingStore<CsvReadingStore, SystemClock>, SystemClock>;

#[derive(Debug, Parser)]
#[command(
    name = "lease-tracker",
    version,
    about = "Track lease odometer readings and project end-of-term mileage"
)]
struct Cli {
    /// Readings CSV file (default: $LEASE_READINGS_PATH or lease_readings.csv)
    #[arg(long, global = true)]
    readings: Option<PathBuf>,

    /// Contract start date (YYYY-MM-DD)
    #[arg(long, global = true)]
    start_date: Option<NaiveDate>,

    /// Contract length in whole years
    #[arg(long, global = true)]
    term_years: Option<u32>,

    /// Allowed distance per year
    #[arg(long, global = true)]
    annual_cap: Option<f64>,

    /// Cost per unit of distance over the cap
    #[arg(long, global = true)]
    penalty: Option<f64>,

    /// Odometer value at contract start
    #[arg(long, global = true)]
    start_odometer: Option<u64>,

    /// Handling of readings dated outside the term: accept, warn, reject
    #[arg(long, global = true, default_value_t = WindowPolicy::Accept)]
    window_policy: WindowPolicy,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record an odometer reading
    Add {
        /// Odometer value
        #[arg(long)]
        odometer: u64,

        /// Reading date (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List recorded readings
    List,

    /// Show the mileage projection
    Status {
        /// Evaluation date (default: today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Cumulative usage at each reading
    History {
        /// Write CSV here instead of printing a table
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show a single reading
    Show {
        /// Position in the date-ordered list (0-based)
        #[arg(long, conflicts_with = "from")]
        index: Option<usize>,

        /// Start at the first reading on or after this date
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Move this many readings from the starting position
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        step: isize,
    },
}

impl Cli {
    fn lease_config(&self) -> Result<LeaseConfig> {
        let mut terms = terms_from_env();
        if let Some(start_date) = self.start_date {
            terms.start_date = start_date;
        }
        if let Some(term_years) = self.term_years {
            terms.term_years = term_years;
        }
        if let Some(annual_cap) = self.annual_cap {
            terms.annual_cap = annual_cap;
        }
        if let Some(penalty) = self.penalty {
            terms.penalty_per_unit = penalty;
        }
        if let Some(start_odometer) = self.start_odometer {
            terms.start_odometer = start_odometer;
        }

        LeaseConfig::try_from(terms).context("Invalid lease terms")
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.lease_config()?;
    let path = cli.readings.clone().unwrap_or_else(readings_path_from_env);
    debug!("Lease config: {:?}, readings: {}", config, path.display());

    let store = CsvReadingStore::open(&path)
        .with_context(|| format!("Unable to open readings file {}", path.display()))?;
    let mut tracker: Tracker = LeaseTracker::new(
        config,
        CachedReadingStore::new(store, SystemClock),
        SystemClock,
    )
    .with_policy(cli.window_policy);

    match cli.command {
        Command::Add { odometer, date } => {
            let date = date.unwrap_or_else(|| SystemClock.today());
            let reading = tracker.record(date, odometer)?;
            println!(
                "Added reading #{}: {} on {}",
                reading.id, reading.odometer, reading.reading_date
            );
        }
        Command::List => list(&tracker)?,
        Command::Status { as_of, json } => {
            let result = match as_of {
                Some(date) => tracker.status_as_of(date)?,
                None => tracker.status()?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_status(tracker.config(), &result);
            }
        }
        Command::History { output } => history(&tracker, output)?,
        Command::Show { index, from, step } => show(&tracker, index, from, step)?,
    }

    Ok(())
}

fn list(tracker: &Tracker) -> Result<()> {
    let readings = tracker.readings()?;
    if readings.is_empty() {
        println!("No readings recorded yet. Add one with `lease-tracker add --odometer N`.");
        return Ok(());
    }

    println!("{:>5} {:>12} {:>10}", "Id", "Date", "Odometer");
    println!("{}", "-".repeat(29));
    for reading in &readings {
        println!(
            "{:>5} {:>12} {:>10}",
            reading.id, reading.reading_date, reading.odometer
        );
    }
    Ok(())
}

fn print_status(config: &LeaseConfig, result: &ProjectionResult) {
    println!("Lease Mileage Status as of {}", result.as_of);
    println!("==================================\n");

    println!(
        "Term: {} to {} ({} days, {} years)",
        config.start_date(),
        result.end_date,
        result.term_total_days,
        config.term_years()
    );
    println!(
        "  Annual cap: {:.0}  Daily cap: {:.1}  Penalty/unit: {:.2}",
        config.annual_cap(),
        result.daily_cap,
        config.penalty_per_unit()
    );
    println!(
        "  Days elapsed: {}  Days remaining: {}",
        result.elapsed_days, result.remaining_days
    );
    println!();

    match result.current_odometer {
        Some(odometer) => println!("  Current odometer: {}", odometer),
        None => println!("  Current odometer: (no readings)"),
    }
    println!(
        "  Used: {} ({:.1}% of cap)  Allowed to date: {:.2}",
        result.used_distance,
        result.cap_utilization() * 100.0,
        result.allowed_to_date
    );
    println!(
        "  Variance: {:+.2} ({})",
        result.variance,
        if result.is_over_pace() { "over pace" } else { "within allowance" }
    );
    println!(
        "  Average/day: {:.2}  Needed/day to stay on cap: {:.2}",
        result.avg_per_day, result.needed_per_day
    );
    println!();

    println!("Projection:");
    println!("  Projected total: {:.2} of {:.2} cap", result.projected_total, result.total_cap);
    println!("  Projected overage: {:.2}", result.projected_overage);
    println!("  Projected penalty: {:.2}", result.projected_penalty);
}

fn history(tracker: &Tracker, output: Option<PathBuf>) -> Result<()> {
    let points = tracker.history()?;

    if let Some(path) = output {
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        for point in &points {
            writer.serialize(point)?;
        }
        writer.flush()?;
        println!("History written to: {} ({} rows)", path.display(), points.len());
        return Ok(());
    }

    println!(
        "{:>12} {:>10} {:>10} {:>12} {:>12}",
        "Date", "Odometer", "Used", "Allowed", "Variance"
    );
    println!("{}", "-".repeat(60));
    for point in &points {
        println!(
            "{:>12} {:>10} {:>10} {:>12.2} {:>+12.2}",
            point.reading_date,
            point.odometer,
            point.used_distance,
            point.allowed_at_date,
            point.variance
        );
    }
    Ok(())
}

fn show(
    tracker: &Tracker,
    index: Option<usize>,
    from: Option<NaiveDate>,
    step: isize,
) -> Result<()> {
    let readings = tracker.readings()?;

    let selection = match (index, from) {
        (Some(index), _) => Selection::starting_at(index, readings.len()),
        (None, Some(date)) => Selection::first_at_or_after(&readings, |r| r.reading_date, date),
        (None, None) => Selection::first_at_or_after(
            &readings,
            |r| r.reading_date,
            SystemClock.today(),
        ),
    }
    .step(step);

    let (Some(position), Some(reading)) = (selection.index(), selection.current(&readings)) else {
        println!("No readings recorded yet.");
        return Ok(());
    };

    println!(
        "Reading {} of {}: #{} {} odometer {}",
        position + 1,
        selection.len(),
        reading.id,
        reading.reading_date,
        reading.odometer
    );
    if selection.has_previous() {
        println!("  previous: --index {}", position - 1);
    }
    if selection.has_next() {
        println!("  next:     --index {}", position + 1);
    }
    Ok(())
}
