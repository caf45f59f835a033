//! Synthetic two-year sales data for demos and tests.
//!
//! Daily revenue follows a linear trend with a gentle sine seasonality; the
//! prior year runs at 92% of the current one. Each item takes a fixed share
//! of the day's total, with Gaussian noise on top. One item is launched mid
//! range (current-only keys) and one is discontinued early (prior-only keys),
//! so both sides of the merge are exercised.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::RawYearRow;
use crate::error::AppError;

pub const CURRENT_FILE: &str = "sales_current.csv";
pub const PRIOR_FILE: &str = "sales_prior.csv";

const HEADER: [&str; 7] = ["date", "Season", "Item", "MSRP", "revenue", "COGS", "Discount"];

const BASE_REVENUE: f64 = 120_000.0;
const DAILY_TREND: f64 = 1_600.0;
const SEASONALITY_PERIOD: f64 = 5.5;
const SEASONALITY_AMPLITUDE: f64 = 0.08;
const PRIOR_SCALE: f64 = 0.92;
const NOISE_SD: f64 = 0.04;

/// `(item, season, share of daily revenue, msrp)`.
const CATALOG: [(&str, &str, f64, f64); 5] = [
    ("Item Alpha", "S/S", 0.29, 189.0),
    ("Item Beta", "S/S", 0.23, 129.0),
    ("Item Gamma", "S/S", 0.19, 99.0),
    ("Item Delta", "F/W", 0.16, 249.0),
    ("Item Epsilon", "F/W", 0.13, 79.0),
];

/// Launched partway through the range: current-year rows only.
const LAUNCHED: (&str, &str, f64, f64) = ("Item Zeta", "F/W", 0.06, 159.0);

/// Dropped after the first days: prior-year rows only.
const DISCONTINUED: (&str, &str, f64, f64) = ("Item Omega", "S/S", 0.05, 59.0);

/// Year-specific cost structure, as fractions of revenue.
#[derive(Debug, Clone, Copy)]
struct Margins {
    cogs: f64,
    discount: f64,
}

const CURRENT_MARGINS: Margins = Margins {
    cogs: 0.67,
    discount: 0.05,
};
const PRIOR_MARGINS: Margins = Margins {
    cogs: 0.69,
    discount: 0.04,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleConfig {
    pub start: NaiveDate,
    pub days: usize,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or(NaiveDate::MIN),
            days: 31,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SampleData {
    pub current: Vec<RawYearRow>,
    pub prior: Vec<RawYearRow>,
}

pub fn generate_sample(config: &SampleConfig) -> Result<SampleData, AppError> {
    if config.days == 0 {
        return Err(AppError::invalid_parameter("Sample day count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, NOISE_SD)
        .map_err(|e| AppError::invalid_parameter(format!("Noise distribution error: {e}")))?;

    let launch_day = config.days / 3;
    let discontinue_day = (config.days / 6).max(1);
    let mut out = SampleData::default();

    for i in 0..config.days {
        let date = config
            .start
            .checked_add_signed(Duration::days(i as i64))
            .ok_or_else(|| AppError::invalid_parameter("Sample date range overflows the calendar."))?
            .format("%Y-%m-%d")
            .to_string();

        let x = i as f64;
        let day_total = (BASE_REVENUE + x * DAILY_TREND) * (1.0 + (x / SEASONALITY_PERIOD).sin() * SEASONALITY_AMPLITUDE);

        for &(item, season, share, msrp) in &CATALOG {
            let current = day_total * share * (1.0 + normal.sample(&mut rng));
            let prior = day_total * PRIOR_SCALE * share * (1.0 + normal.sample(&mut rng));
            out.current.push(row(&date, season, item, msrp, current, CURRENT_MARGINS));
            out.prior.push(row(&date, season, item, msrp, prior, PRIOR_MARGINS));
        }

        if i >= launch_day {
            let (item, season, share, msrp) = LAUNCHED;
            let current = day_total * share * (1.0 + normal.sample(&mut rng));
            out.current.push(row(&date, season, item, msrp, current, CURRENT_MARGINS));
        }
        if i < discontinue_day {
            let (item, season, share, msrp) = DISCONTINUED;
            let prior = day_total * PRIOR_SCALE * share * (1.0 + normal.sample(&mut rng));
            out.prior.push(row(&date, season, item, msrp, prior, PRIOR_MARGINS));
        }
    }

    Ok(out)
}

fn row(date: &str, season: &str, item: &str, msrp: f64, revenue: f64, margins: Margins) -> RawYearRow {
    let revenue = revenue.max(0.0).round();
    RawYearRow {
        date: date.to_string(),
        season: season.to_string(),
        item: item.to_string(),
        msrp: format!("{msrp:.0}"),
        revenue: format!("{revenue:.0}"),
        cogs: format!("{:.0}", (revenue * margins.cogs).round()),
        discount: format!("{:.0}", (revenue * margins.discount).round()),
    }
}

/// Write both years into `dir`, returning `(current, prior)` paths.
pub fn write_sample_csvs(dir: &Path, data: &SampleData) -> Result<(PathBuf, PathBuf), AppError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", dir.display())))?;

    let current = dir.join(CURRENT_FILE);
    let prior = dir.join(PRIOR_FILE);
    write_year_csv(&current, &data.current)?;
    write_year_csv(&prior, &data.prior)?;
    Ok((current, prior))
}

fn write_year_csv(path: &Path, rows: &[RawYearRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);
    let write_err = |e: csv::Error| AppError::io(format!("Failed to write sample CSV '{}': {e}", path.display()));

    writer.write_record(HEADER).map_err(write_err)?;
    for r in rows {
        writer
            .write_record([&r.date, &r.season, &r.item, &r.msrp, &r.revenue, &r.cogs, &r.discount])
            .map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush sample CSV '{}': {e}", path.display())))?;
    Ok(())
}
