//! Query responses.
//!
//! Each view is wrapped with `loaded_at`, the time the underlying dataset was
//! loaded (not the time the query ran), so consumers can tell stale data
//! apart from fresh data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    DatasetStats, DerivedPoint, ItemSummary, NamedSeries, QueryKind, SeasonProgress, SeriesMeta, TimeSeries,
    YoySnapshot,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub items: Vec<ItemSummary>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub progress: SeasonProgress,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoyResponse {
    #[serde(flatten)]
    pub snapshot: YoySnapshot,
    pub loaded_at: DateTime<Utc>,
}

/// Derived points plus the chart-oriented named series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesResponse {
    pub meta: SeriesMeta,
    pub points: Vec<DerivedPoint>,
    pub series: Vec<NamedSeries>,
    pub loaded_at: DateTime<Utc>,
}

impl TimeseriesResponse {
    pub fn new(ts: TimeSeries, loaded_at: DateTime<Utc>) -> Self {
        let series = ts.named_series();
        Self {
            meta: ts.meta,
            points: ts.points,
            series,
            loaded_at,
        }
    }

    pub fn series(&self, name: &str) -> Option<&NamedSeries> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// Every view for one selection.
///
/// The item table, progress, snapshot and `timeseries` ignore the item filter;
/// `item_timeseries` is the same series restricted to the selected item and is
/// only present when one is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub items: Vec<ItemSummary>,
    pub progress: SeasonProgress,
    pub yoy: YoySnapshot,
    pub timeseries: TimeseriesResponse,
    pub item_timeseries: Option<TimeseriesResponse>,
    pub stats: DatasetStats,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Items(ItemsResponse),
    Progress(ProgressResponse),
    Yoy(YoyResponse),
    Timeseries(TimeseriesResponse),
    Dashboard(Box<DashboardResponse>),
}

impl Response {
    pub fn kind(&self) -> QueryKind {
        match self {
            Response::Items(_) => QueryKind::Items,
            Response::Progress(_) => QueryKind::Progress,
            Response::Yoy(_) => QueryKind::Yoy,
            Response::Timeseries(_) => QueryKind::Timeseries,
            Response::Dashboard(_) => QueryKind::Dashboard,
        }
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        match self {
            Response::Items(r) => r.loaded_at,
            Response::Progress(r) => r.loaded_at,
            Response::Yoy(r) => r.loaded_at,
            Response::Timeseries(r) => r.loaded_at,
            Response::Dashboard(r) => r.loaded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Metric, Windows};
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_opt(0, 0).unwrap()
    }

    #[test]
    fn progress_is_flattened_next_to_loaded_at() {
        let r = Response::Progress(ProgressResponse {
            progress: SeasonProgress {
                total_current: 10.0,
                total_prior: 5.0,
                season_target: 100.0,
                season_progress: 10.0,
            },
            loaded_at: epoch(),
        });
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["season_progress"], 10.0);
        assert_eq!(v["loaded_at"], "1970-01-01T00:00:00Z");
        assert_eq!(r.kind(), QueryKind::Progress);
    }

    #[test]
    fn missing_yoy_serializes_as_null() {
        let r = YoyResponse {
            snapshot: YoySnapshot {
                baseline: 100.0,
                metric: Metric::Revenue,
                yoy_pct: Windows::default(),
                yoy_ratio: Windows::default(),
            },
            loaded_at: epoch(),
        };
        let v = serde_json::to_value(&r).unwrap();
        assert!(v["yoy_pct"]["today"].is_null());
        assert_eq!(v["metric"], "revenue");
        assert_eq!(v["baseline"], 100.0);
    }
}
