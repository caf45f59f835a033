//! Shared query logic used by every command.
//!
//! Keeping this in one place means each view is computed the same way whether
//! it is printed, exported, or polled by `watch`:
//! dataset -> filter -> bucket/derive or view -> response
//!
//! Nothing here does I/O; the service layer supplies the dataset.

use chrono::{DateTime, Utc};

use crate::aggregate::{YtdWindow, build_timeseries, filter, item_summary, season_progress, yoy_snapshot};
use crate::config::DashboardConfig;
use crate::domain::{
    DashboardResponse, Dataset, ItemsResponse, Observation, ProgressResponse, Query, QueryKind, Response,
    TimeseriesResponse, YoyResponse, YoySnapshot,
};
use crate::error::AppError;

/// Answer one query against an already-loaded dataset.
pub fn run_query(
    dataset: &Dataset,
    loaded_at: DateTime<Utc>,
    kind: QueryKind,
    query: &Query,
    config: &DashboardConfig,
) -> Result<Response, AppError> {
    let observations = &dataset.observations;

    let response = match kind {
        QueryKind::Items => {
            let selection = filter(observations, &query.filter.without_item());
            Response::Items(ItemsResponse {
                items: item_summary(&selection, config.item_target),
                loaded_at,
            })
        }
        QueryKind::Progress => {
            let selection = filter(observations, &query.filter);
            Response::Progress(ProgressResponse {
                progress: season_progress(&selection, config.season_target),
                loaded_at,
            })
        }
        QueryKind::Yoy => {
            let selection = filter(observations, &query.filter);
            Response::Yoy(YoyResponse {
                snapshot: snapshot(&selection, query, config)?,
                loaded_at,
            })
        }
        QueryKind::Timeseries => {
            let selection = filter(observations, &query.filter);
            Response::Timeseries(TimeseriesResponse::new(build_timeseries(&selection, query)?, loaded_at))
        }
        QueryKind::Dashboard => Response::Dashboard(Box::new(dashboard(dataset, loaded_at, query, config)?)),
    };

    Ok(response)
}

/// All views for the selection with the item filter dropped, plus the
/// selected item's own series.
fn dashboard(
    dataset: &Dataset,
    loaded_at: DateTime<Utc>,
    query: &Query,
    config: &DashboardConfig,
) -> Result<DashboardResponse, AppError> {
    let overall_query = Query {
        filter: query.filter.without_item(),
        ..query.clone()
    };
    let overall = filter(&dataset.observations, &overall_query.filter);

    let item_timeseries = match query.filter.item {
        Some(_) => {
            let selection = filter(&dataset.observations, &query.filter);
            Some(TimeseriesResponse::new(build_timeseries(&selection, query)?, loaded_at))
        }
        None => None,
    };

    Ok(DashboardResponse {
        items: item_summary(&overall, config.item_target),
        progress: season_progress(&overall, config.season_target),
        yoy: snapshot(&overall, &overall_query, config)?,
        timeseries: TimeseriesResponse::new(build_timeseries(&overall, &overall_query)?, loaded_at),
        item_timeseries,
        stats: dataset.stats.clone(),
        loaded_at,
    })
}

fn snapshot(selection: &[Observation], query: &Query, config: &DashboardConfig) -> Result<YoySnapshot, AppError> {
    let window = ytd_window(query, config);
    yoy_snapshot(selection, query.metric, window.as_ref())
}

/// YTD runs from the configured start to the caller's end date; no end, no YTD.
fn ytd_window(query: &Query, config: &DashboardConfig) -> Option<YtdWindow> {
    let end = query.filter.end.clone()?;
    Some(YtdWindow {
        start: config.ytd_start.clone(),
        end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::merge_dataset;
    use crate::domain::{QueryParams, RawYearRow, Unit};
    use chrono::TimeZone;

    fn row(date: &str, season: &str, item: &str, revenue: f64) -> RawYearRow {
        RawYearRow {
            date: date.to_string(),
            season: season.to_string(),
            item: item.to_string(),
            revenue: revenue.to_string(),
            ..RawYearRow::default()
        }
    }

    fn dataset() -> Dataset {
        let current = vec![
            row("2026-01-01", "S/S", "A", 100.0),
            row("2026-01-01", "S/S", "B", 300.0),
            row("2026-01-02", "F/W", "A", 200.0),
        ];
        let prior = vec![
            row("2026-01-01", "S/S", "A", 50.0),
            row("2026-01-01", "S/S", "B", 100.0),
            row("2026-01-03", "F/W", "B", 80.0),
        ];
        merge_dataset(&current, &prior, Vec::new())
    }

    fn at() -> DateTime<Utc> {
        Utc.timestamp_opt(1_767_225_600, 0).unwrap()
    }

    fn query(params: QueryParams) -> Query {
        Query::parse(&params).unwrap()
    }

    #[test]
    fn items_ignore_the_item_filter() {
        let q = query(QueryParams {
            item: Some("A".to_string()),
            ..QueryParams::default()
        });
        let Response::Items(r) = run_query(&dataset(), at(), QueryKind::Items, &q, &DashboardConfig::default()).unwrap()
        else {
            panic!("expected items");
        };
        let names: Vec<&str> = r.items.iter().map(|i| i.item.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(r.loaded_at, at());
    }

    #[test]
    fn progress_honours_every_filter() {
        let q = query(QueryParams {
            season: Some("S/S".to_string()),
            item: Some("B".to_string()),
            ..QueryParams::default()
        });
        let Response::Progress(r) =
            run_query(&dataset(), at(), QueryKind::Progress, &q, &DashboardConfig::default()).unwrap()
        else {
            panic!("expected progress");
        };
        assert_eq!(r.progress.total_current, 300.0);
        assert_eq!(r.progress.total_prior, 100.0);
    }

    #[test]
    fn yoy_has_no_ytd_without_an_end_date() {
        let q = query(QueryParams::default());
        let Response::Yoy(r) = run_query(&dataset(), at(), QueryKind::Yoy, &q, &DashboardConfig::default()).unwrap()
        else {
            panic!("expected yoy");
        };
        assert_eq!(r.snapshot.yoy_pct.ytd, None);
        assert_eq!(r.snapshot.yoy_ratio.ytd, None);
        // Last observation is the prior-only 2026-01-03 row: current 0.
        assert_eq!(r.snapshot.yoy_pct.today, Some(0.0));
    }

    #[test]
    fn yoy_ytd_runs_to_the_end_date() {
        let q = query(QueryParams {
            end: Some("2026-01-03".to_string()),
            ..QueryParams::default()
        });
        let Response::Yoy(r) = run_query(&dataset(), at(), QueryKind::Yoy, &q, &DashboardConfig::default()).unwrap()
        else {
            panic!("expected yoy");
        };
        // Everything is inside 2026-01-01..=2026-01-03: 600 / 230.
        assert_eq!(r.snapshot.yoy_pct.ytd, Some(260.87));
    }

    #[test]
    fn timeseries_carries_named_series() {
        let q = query(QueryParams {
            unit: Some("month".to_string()),
            ..QueryParams::default()
        });
        let Response::Timeseries(r) =
            run_query(&dataset(), at(), QueryKind::Timeseries, &q, &DashboardConfig::default()).unwrap()
        else {
            panic!("expected timeseries");
        };
        assert_eq!(r.meta.unit, Unit::Month);
        assert_eq!(r.points.len(), 1);
        assert_eq!(r.points[0].cumulative_current, 600.0);
        let cum = r.series("cum_revenue_current").unwrap();
        assert_eq!(cum.points[0].y, Some(600.0));
    }

    #[test]
    fn dashboard_adds_item_series_only_when_selected() {
        let config = DashboardConfig::default();
        let all = query(QueryParams::default());
        let Response::Dashboard(r) = run_query(&dataset(), at(), QueryKind::Dashboard, &all, &config).unwrap() else {
            panic!("expected dashboard");
        };
        assert!(r.item_timeseries.is_none());
        assert_eq!(r.yoy.yoy_pct.ytd, None);
        assert_eq!(r.stats.observations, 4);

        let one = query(QueryParams {
            item: Some("A".to_string()),
            ..QueryParams::default()
        });
        let Response::Dashboard(r) = run_query(&dataset(), at(), QueryKind::Dashboard, &one, &config).unwrap() else {
            panic!("expected dashboard");
        };
        assert_eq!(r.items.len(), 2);
        assert_eq!(r.timeseries.meta.item, None);
        let item_ts = r.item_timeseries.unwrap();
        assert_eq!(item_ts.meta.item.as_deref(), Some("A"));
        assert_eq!(item_ts.points.len(), 2);
    }
}
