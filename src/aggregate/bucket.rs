//! Time bucketing.
//!
//! Labels per unit:
//!
//! | unit            | label             | order                 |
//! |-----------------|-------------------|-----------------------|
//! | `day`           | `YYYY-MM-DD`      | observation order     |
//! | `week_fixed_7d` | `W<n>` (1-based)  | positional            |
//! | `week_iso`      | `<isoYear>-W<ww>` | lexical (= calendar)  |
//! | `month`         | `YYYY-MM`         | lexical (= calendar)  |
//!
//! `week_fixed_7d` cuts the (date-sorted) sequence into runs of 7 by position,
//! so its boundaries move with the filter's start date. `week_iso` is the
//! calendar-true alternative. Both are offered on purpose.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{Bucket, Metric, Observation, Unit};
use crate::error::AppError;

/// Observations per fixed week.
pub const FIXED_WEEK_LEN: usize = 7;

/// Group `observations` into buckets of `unit`, summing `metric` for both years.
///
/// Only `week_iso` needs to parse dates, so it is the only unit that can fail.
pub fn bucket(observations: &[Observation], unit: Unit, metric: Metric) -> Result<Vec<Bucket>, AppError> {
    match unit {
        Unit::Day => Ok(by_day(observations, metric)),
        Unit::WeekFixed7d => Ok(by_fixed_week(observations, metric)),
        Unit::WeekIso => by_label(observations, metric, |o| iso_week_label(&o.date)),
        Unit::Month => by_label(observations, metric, |o| Ok(month_label(&o.date).to_string())),
    }
}

fn by_day(observations: &[Observation], metric: Metric) -> Vec<Bucket> {
    observations
        .iter()
        .map(|o| Bucket {
            label: o.date.clone(),
            value_current: metric.current(o),
            value_prior: metric.prior(o),
        })
        .collect()
}

fn by_fixed_week(observations: &[Observation], metric: Metric) -> Vec<Bucket> {
    observations
        .chunks(FIXED_WEEK_LEN)
        .enumerate()
        .map(|(idx, run)| {
            let mut b = Bucket {
                label: format!("W{}", idx + 1),
                value_current: 0.0,
                value_prior: 0.0,
            };
            for o in run {
                b.value_current += metric.current(o);
                b.value_prior += metric.prior(o);
            }
            b
        })
        .collect()
}

fn by_label<F>(observations: &[Observation], metric: Metric, label_of: F) -> Result<Vec<Bucket>, AppError>
where
    F: Fn(&Observation) -> Result<String, AppError>,
{
    // BTreeMap keeps labels in ascending lexical order.
    let mut sums: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for o in observations {
        let entry = sums.entry(label_of(o)?).or_insert((0.0, 0.0));
        entry.0 += metric.current(o);
        entry.1 += metric.prior(o);
    }

    Ok(sums
        .into_iter()
        .map(|(label, (value_current, value_prior))| Bucket {
            label,
            value_current,
            value_prior,
        })
        .collect())
}

/// `YYYY-MM` prefix of a date string.
pub fn month_label(date: &str) -> &str {
    date.get(..7).unwrap_or(date)
}

/// `<isoYear>-W<ww>` label for a `YYYY-MM-DD` date string.
pub fn iso_week_label(date: &str) -> Result<String, AppError> {
    let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::parse(format!("Invalid date '{date}' in dataset. Expected YYYY-MM-DD.")))?;
    let (year, week) = iso_week(parsed)?;
    Ok(format!("{year}-W{week:02}"))
}

/// ISO-8601 week-year and week number.
///
/// Shift to the Thursday of the date's week (Monday=1..Sunday=7); that
/// Thursday's calendar year is the ISO year, and the week number is
/// `ceil((days since Jan 1 of that year + 1) / 7)`.
pub fn iso_week(date: NaiveDate) -> Result<(i32, u32), AppError> {
    let weekday = i64::from(date.weekday().number_from_monday());
    let thursday = date
        .checked_add_signed(Duration::days(4 - weekday))
        .ok_or_else(|| AppError::parse(format!("Date {date} is out of range for ISO week numbering.")))?;

    let year = thursday.year();
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| AppError::parse(format!("Year {year} is out of range for ISO week numbering.")))?;

    let days = (thursday - jan1).num_days();
    let week = (days + 1 + 6) / 7;
    Ok((year, week as u32))
}
