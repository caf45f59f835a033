//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - resolves configuration (defaults, `.env`, env vars, flags)
//! - runs queries through the shared service
//! - prints reports/plots
//! - writes optional exports

use std::path::Path;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;

use crate::app::service::DashboardService;
use crate::cli::{Command, ConfigArgs, ItemsArgs, PlotArgs, QueryArgs, SampleArgs, TimeseriesArgs, WatchArgs};
use crate::config::DashboardConfig;
use crate::data::{SampleConfig, generate_sample, write_sample_csvs};
use crate::domain::{Query, QueryKind, Response};
use crate::error::AppError;

pub mod pipeline;
pub mod service;

/// Entry point for the `sales` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    crate::logging::init(cli.verbose);

    match cli.command {
        Command::Items(args) => handle_items(&service(&cli.config)?, &args),
        Command::Progress(args) => handle_query(&service(&cli.config)?, QueryKind::Progress, &args),
        Command::Yoy(args) => handle_query(&service(&cli.config)?, QueryKind::Yoy, &args),
        Command::Dashboard(args) => handle_query(&service(&cli.config)?, QueryKind::Dashboard, &args),
        Command::Timeseries(args) => handle_timeseries(&service(&cli.config)?, &args),
        Command::Watch(args) => handle_watch(&service(&cli.config)?, &args),
        Command::Sample(args) => handle_sample(&args),
        Command::Plot(args) => handle_plot(&args),
    }
}

fn service(args: &ConfigArgs) -> Result<DashboardService, AppError> {
    let config = DashboardConfig::from_env()?.with_overrides(&args.overrides())?;
    tracing::debug!(current = %config.current, prior = %config.prior, "resolved configuration");
    Ok(DashboardService::new(config))
}

/// Parse, execute, print and export one query.
fn execute(service: &DashboardService, kind: QueryKind, args: &QueryArgs) -> Result<Response, AppError> {
    let result = Query::parse(&args.params()).and_then(|query| service.execute(kind, &query));

    match result {
        Ok(response) => {
            if let Some(path) = &args.export_json {
                crate::io::write_response_json(path, &response)?;
            }
            Ok(response)
        }
        Err(err) => {
            if args.json {
                // Structured body on stdout; main still reports the message and exit code.
                println!("{}", serde_json::to_string(&err.body()).unwrap_or_default());
            }
            Err(err)
        }
    }
}

fn print_response(response: &Response, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", crate::io::response_json(response)?);
    } else {
        print!("{}", crate::report::format_response(response));
    }
    Ok(())
}

fn handle_query(service: &DashboardService, kind: QueryKind, args: &QueryArgs) -> Result<(), AppError> {
    let response = execute(service, kind, args)?;
    print_response(&response, args.json)
}

fn handle_items(service: &DashboardService, args: &ItemsArgs) -> Result<(), AppError> {
    let response = execute(service, QueryKind::Items, &args.query)?;
    print_response(&response, args.query.json)?;

    if let (Some(path), Response::Items(items)) = (&args.export, &response) {
        crate::io::write_items_csv(path, &items.items)?;
    }
    Ok(())
}

fn handle_timeseries(service: &DashboardService, args: &TimeseriesArgs) -> Result<(), AppError> {
    let response = execute(service, QueryKind::Timeseries, &args.query)?;
    print_response(&response, args.query.json)?;

    let Response::Timeseries(series) = &response else {
        return Ok(());
    };

    if args.plot && !args.no_plot && !args.query.json {
        let plot = crate::plot::render_series_plot(
            &series.points,
            series.meta.metric,
            args.plot_series,
            args.width,
            args.height,
        );
        println!("\n{plot}");
    }

    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, series)?;
    }

    Ok(())
}

fn handle_watch(service: &DashboardService, args: &WatchArgs) -> Result<(), AppError> {
    let interval = Duration::from_secs(args.interval_secs);
    let mut run = 0usize;

    loop {
        run += 1;
        tracing::info!(run, kind = args.kind.as_str(), "watch run");

        // A failed run is reported and retried next tick; the cache keeps the
        // last good dataset.
        match execute(service, args.kind, &args.query) {
            Ok(response) => print_response(&response, args.query.json)?,
            Err(err) => eprintln!("{err}"),
        }

        if args.iterations.is_some_and(|n| run >= n) {
            return Ok(());
        }
        thread::sleep(interval);
    }
}

fn handle_sample(args: &SampleArgs) -> Result<(), AppError> {
    let start = NaiveDate::parse_from_str(args.start.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::invalid_parameter(format!("Invalid --start '{}'. Expected YYYY-MM-DD.", args.start))
    })?;
    let config = SampleConfig {
        start,
        days: args.days,
        seed: args.seed,
    };

    let data = generate_sample(&config)?;
    let (current, prior) = write_sample_csvs(&args.out, &data)?;

    println!("Wrote {} current-year rows to {}", data.current.len(), current.display());
    println!("Wrote {} prior-year rows to {}", data.prior.len(), prior.display());
    println!("{}", sample_hint(&current, &prior));
    Ok(())
}

fn sample_hint(current: &Path, prior: &Path) -> String {
    format!(
        "Try: sales dashboard --current {} --prior {}",
        current.display(),
        prior.display()
    )
}

fn handle_plot(args: &PlotArgs) -> Result<(), AppError> {
    let series = crate::io::read_timeseries_json(&args.series)?;
    let plot = crate::plot::render_series_plot(
        &series.points,
        series.meta.metric,
        args.plot_series,
        args.width,
        args.height,
    );
    println!("{plot}");
    Ok(())
}
