//! Command-line parsing for the sales YoY dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! aggregation code. Unit, metric and date values stay strings here and are
//! validated by `Query::parse`, so the CLI rejects them exactly like any
//! other caller would.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::domain::{QueryKind, QueryParams};
use crate::plot::PlotSeries;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sales", version, about = "Year-over-year sales analytics")]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Log at debug level (overridden by SALES_LOG / RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Per-item revenue, YoY and progress against the item target.
    Items(ItemsArgs),
    /// Season totals and progress against the season target.
    Progress(QueryArgs),
    /// YoY for the latest day, last 7 observations, latest month and YTD.
    Yoy(QueryArgs),
    /// Bucketed series with YoY and cumulative totals, optionally plotted.
    Timeseries(TimeseriesArgs),
    /// Every view at once, plus the selected item's series.
    Dashboard(QueryArgs),
    /// Re-run a query on an interval against the same service (cache stays warm).
    Watch(WatchArgs),
    /// Write synthetic current/prior CSVs.
    Sample(SampleArgs),
    /// Plot a previously exported time series JSON.
    Plot(PlotArgs),
}

/// Source and target overrides, accepted before or after the subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct ConfigArgs {
    /// Current-year CSV path or URL (default: $SALES_CURRENT_CSV).
    #[arg(long, global = true, value_name = "PATH|URL")]
    pub current: Option<String>,

    /// Prior-year CSV path or URL (default: $SALES_PRIOR_CSV).
    #[arg(long, global = true, value_name = "PATH|URL")]
    pub prior: Option<String>,

    /// Revenue target per item.
    #[arg(long, global = true)]
    pub item_target: Option<f64>,

    /// Revenue target for the season.
    #[arg(long, global = true)]
    pub season_target: Option<f64>,

    /// First day of the YTD window (YYYY-MM-DD).
    #[arg(long, global = true)]
    pub ytd_start: Option<String>,

    /// Dataset cache lifetime in milliseconds.
    #[arg(long, global = true)]
    pub cache_ttl_ms: Option<u64>,
}

impl ConfigArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            current: self.current.clone(),
            prior: self.prior.clone(),
            item_target: self.item_target,
            season_target: self.season_target,
            ytd_start: self.ytd_start.clone(),
            cache_ttl_ms: self.cache_ttl_ms,
        }
    }
}

/// Filters and options shared by every query command.
#[derive(Debug, Args, Clone, Default)]
pub struct QueryArgs {
    /// Inclusive start date (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<String>,

    /// Inclusive end date (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<String>,

    /// Season filter ("all" for every season).
    #[arg(long)]
    pub season: Option<String>,

    /// Item filter ("all" for every item).
    #[arg(long)]
    pub item: Option<String>,

    /// Bucket unit: day, week_fixed_7d, week_iso, month.
    #[arg(long)]
    pub unit: Option<String>,

    /// Metric: revenue or profit.
    #[arg(long)]
    pub metric: Option<String>,

    /// Print the response as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Also write the response JSON to a file.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

impl QueryArgs {
    pub fn params(&self) -> QueryParams {
        QueryParams {
            start: self.start.clone(),
            end: self.end.clone(),
            season: self.season.clone(),
            item: self.item.clone(),
            unit: self.unit.clone(),
            metric: self.metric.clone(),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ItemsArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Export the item table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TimeseriesArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Which lines to plot.
    #[arg(long, value_enum, default_value_t = PlotSeries::Cumulative)]
    pub plot_series: PlotSeries,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export derived points to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct WatchArgs {
    /// Query to repeat.
    #[arg(value_enum)]
    pub kind: QueryKind,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Seconds between runs.
    #[arg(long, default_value_t = 5)]
    pub interval_secs: u64,

    /// Stop after this many runs (default: run until interrupted).
    #[arg(long)]
    pub iterations: Option<usize>,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Output directory.
    #[arg(long, default_value = "data")]
    pub out: PathBuf,

    /// Number of days to generate.
    #[arg(long, default_value_t = 31)]
    pub days: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First date (YYYY-MM-DD).
    #[arg(long, default_value = "2026-01-01")]
    pub start: String,
}

/// Options for plotting a saved series.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// JSON file produced by `sales timeseries --export-json`.
    #[arg(long, value_name = "JSON")]
    pub series: PathBuf,

    /// Which lines to plot.
    #[arg(long, value_enum, default_value_t = PlotSeries::Cumulative)]
    pub plot_series: PlotSeries,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
