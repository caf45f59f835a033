//! Where a year's sales file comes from, and how both years are loaded.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use reqwest::blocking::Client;

use crate::aggregate::merge_dataset;
use crate::domain::Dataset;
use crate::error::AppError;
use crate::io::ingest::{IngestedRows, read_year_rows, read_year_rows_from_str};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A local CSV file or an `http(s)://` URL serving one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

/// Cheap change detector for a file source: size plus modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

/// Stamps for both sources; `None` where a source cannot be stamped (URLs).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fingerprint {
    pub current: Option<FileStamp>,
    pub prior: Option<FileStamp>,
}

impl Source {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::Path(PathBuf::from(s))
        }
    }

    /// Read and ingest the source.
    pub fn load(&self) -> Result<IngestedRows, AppError> {
        match self {
            Source::Path(path) => load_file(path),
            Source::Url(url) => load_url(url),
        }
    }

    /// `None` for URLs and for files whose metadata cannot be read.
    pub fn stamp(&self) -> Option<FileStamp> {
        match self {
            Source::Path(path) => {
                let meta = std::fs::metadata(path).ok()?;
                Some(FileStamp {
                    len: meta.len(),
                    modified: meta.modified().ok(),
                })
            }
            Source::Url(_) => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{url}"),
        }
    }
}

fn load_file(path: &Path) -> Result<IngestedRows, AppError> {
    let label = path.display().to_string();
    let file = File::open(path).map_err(|e| AppError::data_unavailable(format!("Failed to open '{label}': {e}")))?;
    read_year_rows(file, &label)
}

fn load_url(url: &str) -> Result<IngestedRows, AppError> {
    let client = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| AppError::data_unavailable(format!("Failed to build HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| AppError::data_unavailable(format!("Failed to fetch '{url}': {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::data_unavailable(format!("Failed to fetch '{url}': HTTP {status}")));
    }

    let body = response
        .text()
        .map_err(|e| AppError::data_unavailable(format!("Failed to read body of '{url}': {e}")))?;
    read_year_rows_from_str(&body, url)
}

/// Fingerprint both sources without reading them.
pub fn fingerprint(current: &Source, prior: &Source) -> Fingerprint {
    Fingerprint {
        current: current.stamp(),
        prior: prior.stamp(),
    }
}

/// Load both years in parallel and merge them.
///
/// Either source failing fails the whole load; no partial dataset is returned.
pub fn load_pair(current: &Source, prior: &Source) -> Result<Dataset, AppError> {
    let (current_rows, prior_rows) = rayon::join(|| current.load(), || prior.load());
    let current_rows = current_rows?;
    let prior_rows = prior_rows?;

    let mut row_errors = current_rows.row_errors;
    row_errors.extend(prior_rows.row_errors);

    let dataset = merge_dataset(&current_rows.rows, &prior_rows.rows, row_errors);
    tracing::info!(
        current = %current,
        prior = %prior,
        observations = dataset.stats.observations,
        prior_only = dataset.stats.prior_only,
        row_errors = dataset.row_errors.len(),
        "loaded sales dataset"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    fn write_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parse_tells_urls_from_paths() {
        assert_eq!(
            Source::parse("https://example.com/sales_2026.csv"),
            Source::Url("https://example.com/sales_2026.csv".to_string())
        );
        assert_eq!(Source::parse("HTTP://x/y.csv"), Source::Url("HTTP://x/y.csv".to_string()));
        assert_eq!(
            Source::parse("data/sales_2026.csv"),
            Source::Path(PathBuf::from("data/sales_2026.csv"))
        );
    }

    #[test]
    fn load_pair_merges_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let cur = write_csv(
            dir.path(),
            "cur.csv",
            "date,Season,Item,MSRP,revenue,COGS,Discount\n2026-01-01,S,A,10,100,40,0\n",
        );
        let pri = write_csv(
            dir.path(),
            "pri.csv",
            "date,Season,Item,MSRP,revenue,COGS,Discount\n2026-01-01,S,A,10,50,20,0\n2026-01-02,S,A,10,70,30,0\n",
        );

        let ds = load_pair(&Source::Path(cur), &Source::Path(pri)).unwrap();
        assert_eq!(ds.observations.len(), 2);
        assert_eq!(ds.observations[0].revenue_current, 100.0);
        assert_eq!(ds.observations[0].revenue_prior, 50.0);
        assert_eq!(ds.stats.prior_only, 1);
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let cur = write_csv(dir.path(), "cur.csv", "date,Season,Item,revenue\n");
        let err = load_pair(&Source::Path(cur), &Source::Path(dir.path().join("nope.csv"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataUnavailable);
        assert!(err.message().contains("nope.csv"));
    }

    #[test]
    fn fingerprint_changes_when_a_file_grows() {
        let dir = tempfile::tempdir().unwrap();
        let cur = Source::Path(write_csv(dir.path(), "cur.csv", "date,Season,Item\n"));
        let pri = Source::Url("https://example.com/prior.csv".to_string());

        let before = fingerprint(&cur, &pri);
        assert!(before.current.is_some());
        assert!(before.prior.is_none());

        if let Source::Path(p) = &cur {
            write_csv(dir.path(), p.file_name().unwrap().to_str().unwrap(), "date,Season,Item\n2026-01-01,S,A\n");
        }
        assert_ne!(fingerprint(&cur, &pri), before);
    }
}
