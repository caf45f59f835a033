//! Response JSON read/write.
//!
//! `sales <query> --export-json` writes the same JSON `--json` prints;
//! `sales plot --series` reads a saved time series back.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::domain::{Response, TimeseriesResponse};
use crate::error::AppError;

/// Pretty JSON for stdout.
pub fn response_json(response: &Response) -> Result<String, AppError> {
    serde_json::to_string_pretty(response).map_err(|e| AppError::io(format!("Failed to serialize response: {e}")))
}

pub fn write_response_json(path: &Path, response: &Response) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create response JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, response)
        .map_err(|e| AppError::io(format!("Failed to write response JSON '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), kind = response.kind().as_str(), "wrote response JSON");
    Ok(())
}

pub fn read_timeseries_json(path: &Path) -> Result<TimeseriesResponse, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::data_unavailable(format!("Failed to open series JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::parse(format!("Invalid series JSON '{}': {e}", path.display())))
}
