//! Export derived series and item tables to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per bucket, missing YoY as an empty cell.

use std::fs::File;
use std::path::Path;

use crate::domain::{ItemSummary, TimeseriesResponse};
use crate::error::AppError;

/// Write one row per derived point.
pub fn write_series_csv(path: &Path, series: &TimeseriesResponse) -> Result<(), AppError> {
    let mut writer = create(path)?;
    let write_err = |e: csv::Error| AppError::io(format!("Failed to write export CSV '{}': {e}", path.display()));

    writer
        .write_record([
            "bucket",
            "unit",
            "metric",
            "value_current",
            "value_prior",
            "yoy_pct",
            "yoy_ratio",
            "cumulative_current",
            "cumulative_prior",
        ])
        .map_err(write_err)?;

    let unit = series.meta.unit.as_str();
    let metric = series.meta.metric.as_str();
    for p in &series.points {
        writer
            .write_record([
                p.label.clone(),
                unit.to_string(),
                metric.to_string(),
                p.value_current.to_string(),
                p.value_prior.to_string(),
                opt(p.yoy_pct),
                opt(p.yoy_ratio),
                p.cumulative_current.to_string(),
                p.cumulative_prior.to_string(),
            ])
            .map_err(write_err)?;
    }

    finish(writer, path)
}

/// Write the item summary table.
pub fn write_items_csv(path: &Path, items: &[ItemSummary]) -> Result<(), AppError> {
    let mut writer = create(path)?;
    let write_err = |e: csv::Error| AppError::io(format!("Failed to write export CSV '{}': {e}", path.display()));

    writer
        .write_record(["item", "revenue_current", "revenue_prior", "yoy", "progress"])
        .map_err(write_err)?;
    for i in items {
        writer
            .write_record([
                i.item.clone(),
                i.revenue_current.to_string(),
                i.revenue_prior.to_string(),
                opt(i.yoy),
                i.progress.to_string(),
            ])
            .map_err(write_err)?;
    }

    finish(writer, path)
}

fn create(path: &Path) -> Result<csv::Writer<File>, AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    Ok(csv::Writer::from_writer(file))
}

fn finish(mut writer: csv::Writer<File>, path: &Path) -> Result<(), AppError> {
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), "wrote export CSV");
    Ok(())
}

fn opt(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}
