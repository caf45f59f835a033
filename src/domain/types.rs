//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation
//! - rendered as text reports or exported to JSON/CSV
//! - compared directly in tests

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// YoY value representing "no change from the prior year".
pub const BASELINE_PCT: f64 = 100.0;

/// One row from a single year's source file, exactly as read.
///
/// Numeric cells stay as strings until merge time so a bad cell only ever
/// affects the field it sits in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawYearRow {
    pub date: String,
    pub season: String,
    pub item: String,
    pub msrp: String,
    pub revenue: String,
    pub cogs: String,
    pub discount: String,
}

/// Identity of an observation across both years.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservationKey {
    pub date: String,
    pub season: String,
    pub item: String,
}

impl ObservationKey {
    pub fn of(row: &RawYearRow) -> Self {
        Self {
            date: row.date.clone(),
            season: row.season.clone(),
            item: row.item.clone(),
        }
    }
}

/// The canonical merged unit: one `(date, season, item)` with both years side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: String,
    pub season: String,
    pub item: String,
    pub revenue_current: f64,
    pub revenue_prior: f64,
    pub profit_current: f64,
    pub profit_prior: f64,
}

impl Observation {
    pub fn key(&self) -> ObservationKey {
        ObservationKey {
            date: self.date.clone(),
            season: self.season.clone(),
            item: self.item.clone(),
        }
    }
}

/// Which value field the time series is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Revenue,
    Profit,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Revenue, Metric::Profit];

    pub fn current(self, obs: &Observation) -> f64 {
        match self {
            Metric::Revenue => obs.revenue_current,
            Metric::Profit => obs.profit_current,
        }
    }

    pub fn prior(self, obs: &Observation) -> f64 {
        match self {
            Metric::Revenue => obs.revenue_prior,
            Metric::Profit => obs.profit_prior,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::Profit => "profit",
        }
    }
}

impl FromStr for Metric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revenue" => Ok(Metric::Revenue),
            "profit" => Ok(Metric::Profit),
            other => Err(AppError::invalid_parameter(format!(
                "Invalid metric '{other}'. Expected one of: revenue, profit."
            ))),
        }
    }
}

/// Time bucketing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// One bucket per observation.
    Day,
    /// Consecutive runs of 7 observations by position (not calendar-aligned).
    WeekFixed7d,
    /// ISO-8601 week-year.
    WeekIso,
    /// Calendar month (`YYYY-MM`).
    Month,
}

impl Unit {
    pub const ALL: [Unit; 4] = [Unit::Day, Unit::WeekFixed7d, Unit::WeekIso, Unit::Month];

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Day => "day",
            Unit::WeekFixed7d => "week_fixed_7d",
            Unit::WeekIso => "week_iso",
            Unit::Month => "month",
        }
    }
}

impl FromStr for Unit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Unit::Day),
            "week_fixed_7d" => Ok(Unit::WeekFixed7d),
            "week_iso" => Ok(Unit::WeekIso),
            "month" => Ok(Unit::Month),
            other => Err(AppError::invalid_parameter(format!(
                "Invalid unit '{other}'. Expected one of: day, week_fixed_7d, week_iso, month."
            ))),
        }
    }
}

/// Summed metric values for one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub value_current: f64,
    pub value_prior: f64,
}

/// A bucket plus its derived YoY and running totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedPoint {
    pub label: String,
    pub value_current: f64,
    pub value_prior: f64,
    /// `None` when the prior value is not positive.
    pub yoy_pct: Option<f64>,
    pub yoy_ratio: Option<f64>,
    pub cumulative_current: f64,
    pub cumulative_prior: f64,
}

/// Per-item revenue totals and progress against the item target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub item: String,
    pub revenue_current: f64,
    pub revenue_prior: f64,
    pub yoy: Option<f64>,
    pub progress: f64,
}

/// Season revenue totals against the season target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonProgress {
    pub total_current: f64,
    pub total_prior: f64,
    pub season_target: f64,
    pub season_progress: f64,
}

/// One value per snapshot window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Windows {
    pub today: Option<f64>,
    pub week: Option<f64>,
    pub month: Option<f64>,
    pub ytd: Option<f64>,
}

/// YoY for the latest day / 7 observations / month, plus optional YTD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoySnapshot {
    pub baseline: f64,
    pub metric: Metric,
    pub yoy_pct: Windows,
    pub yoy_ratio: Windows,
}

/// Echo of the request that produced a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub unit: Unit,
    pub metric: Metric,
    pub start: Option<String>,
    pub end: Option<String>,
    pub season: Option<String>,
    pub item: Option<String>,
    pub baseline: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub meta: SeriesMeta,
    pub points: Vec<DerivedPoint>,
}

/// `(x, y)` pair in a named chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: String,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    /// Chart-oriented projection: `yoy_pct`, `yoy_ratio`, and the two cumulative lines.
    pub fn named_series(&self) -> Vec<NamedSeries> {
        let metric = self.meta.metric.as_str();
        vec![
            project(&self.points, "yoy_pct".to_string(), |p| p.yoy_pct),
            project(&self.points, "yoy_ratio".to_string(), |p| p.yoy_ratio),
            project(&self.points, format!("cum_{metric}_current"), |p| {
                Some(p.cumulative_current)
            }),
            project(&self.points, format!("cum_{metric}_prior_aligned"), |p| {
                Some(p.cumulative_prior)
            }),
        ]
    }
}

fn project(points: &[DerivedPoint], name: String, f: impl Fn(&DerivedPoint) -> Option<f64>) -> NamedSeries {
    NamedSeries {
        name,
        points: points
            .iter()
            .map(|p| SeriesPoint {
                x: p.label.clone(),
                y: f(p),
            })
            .collect(),
    }
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Summary stats about the merged dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub rows_current: usize,
    pub rows_prior: usize,
    pub observations: usize,
    /// Keys that only exist in the prior-year source.
    pub prior_only: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub seasons: Vec<String>,
    pub items: Vec<String>,
}

/// Merged observations plus what happened while reading the sources.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub observations: Vec<Observation>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
}
