//! Read-only projections: item table, season progress, YoY snapshot.

use std::collections::HashMap;

use crate::aggregate::bucket::{FIXED_WEEK_LEN, bucket};
use crate::domain::{BASELINE_PCT, Bucket, ItemSummary, Metric, Observation, SeasonProgress, Unit, Windows, YoySnapshot};
use crate::error::AppError;
use crate::math::{pct_of, round_int, round_to, yoy_pct, yoy_ratio};

/// Revenue target per item.
pub const ITEM_TARGET_REVENUE: f64 = 2_280_000.0;

/// Revenue target for the whole season.
pub const SEASON_TARGET_REVENUE: f64 = 7_500_000.0;

/// First day of the year-to-date window.
pub const DEFAULT_YTD_START: &str = "2026-01-01";

/// Per-item revenue totals, in first-appearance order.
///
/// `observations` should be filtered with every predicate except the item one,
/// so the table always lists all items of the selection.
pub fn item_summary(observations: &[Observation], item_target: f64) -> Vec<ItemSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, (f64, f64)> = HashMap::new();

    for o in observations {
        let entry = totals.entry(o.item.as_str()).or_insert_with(|| {
            order.push(o.item.as_str());
            (0.0, 0.0)
        });
        entry.0 += o.revenue_current;
        entry.1 += o.revenue_prior;
    }

    order
        .into_iter()
        .map(|item| {
            let (current, prior) = totals.get(item).copied().unwrap_or_default();
            ItemSummary {
                item: item.to_string(),
                revenue_current: round_int(current),
                revenue_prior: round_int(prior),
                yoy: pct_of(current, prior).map(|p| round_to(p, 1)),
                progress: round_to(current / item_target * 100.0, 1),
            }
        })
        .collect()
}

/// Season revenue totals against `season_target` (must be positive).
pub fn season_progress(observations: &[Observation], season_target: f64) -> SeasonProgress {
    let total_current: f64 = observations.iter().map(|o| o.revenue_current).sum();
    let total_prior: f64 = observations.iter().map(|o| o.revenue_prior).sum();

    SeasonProgress {
        total_current: round_int(total_current),
        total_prior: round_int(total_prior),
        season_target,
        season_progress: round_to(total_current / season_target * 100.0, 2),
    }
}

/// Inclusive `[start, end]` window for the YTD figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YtdWindow {
    pub start: String,
    pub end: String,
}

/// YoY for today / last 7 observations / last month, plus optional YTD.
///
/// `sorted` must be the date-sorted filtered set. Each window is rounded
/// independently with the same null-on-zero-prior rule as the time series.
pub fn yoy_snapshot(sorted: &[Observation], metric: Metric, ytd: Option<&YtdWindow>) -> Result<YoySnapshot, AppError> {
    let n = sorted.len();

    let today = bucket(&sorted[n.saturating_sub(1)..], Unit::Day, metric)?
        .into_iter()
        .next();
    let week = bucket(&sorted[n.saturating_sub(FIXED_WEEK_LEN)..], Unit::WeekFixed7d, metric)?
        .into_iter()
        .next();
    let month = bucket(sorted, Unit::Month, metric)?.pop();
    let ytd = ytd.map(|w| ytd_totals(sorted, metric, w));

    let pct = |b: Option<&Bucket>| b.and_then(|b| yoy_pct(b.value_current, b.value_prior));
    let pct_windows = Windows {
        today: pct(today.as_ref()),
        week: pct(week.as_ref()),
        month: pct(month.as_ref()),
        ytd: pct(ytd.as_ref()),
    };
    let ratio_windows = Windows {
        today: yoy_ratio(pct_windows.today),
        week: yoy_ratio(pct_windows.week),
        month: yoy_ratio(pct_windows.month),
        ytd: yoy_ratio(pct_windows.ytd),
    };

    Ok(YoySnapshot {
        baseline: BASELINE_PCT,
        metric,
        yoy_pct: pct_windows,
        yoy_ratio: ratio_windows,
    })
}

/// Direct sum over `[start, end]`, not via bucketing.
fn ytd_totals(sorted: &[Observation], metric: Metric, window: &YtdWindow) -> Bucket {
    let mut out = Bucket {
        label: format!("{}..{}", window.start, window.end),
        value_current: 0.0,
        value_prior: 0.0,
    };
    for o in sorted
        .iter()
        .filter(|o| o.date.as_str() >= window.start.as_str() && o.date.as_str() <= window.end.as_str())
    {
        out.value_current += metric.current(o);
        out.value_prior += metric.prior(o);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(date: &str, item: &str, cur: f64, prior: f64) -> Observation {
        Observation {
            date: date.to_string(),
            season: "S".to_string(),
            item: item.to_string(),
            revenue_current: cur,
            revenue_prior: prior,
            profit_current: cur * 0.3,
            profit_prior: prior * 0.3,
        }
    }

    #[test]
    fn item_on_target_is_at_100_percent() {
        let items = item_summary(&[obs("2026-01-01", "A", 2_280_000.0, 2_000_000.0)], ITEM_TARGET_REVENUE);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].progress, 100.0);
        assert_eq!(items[0].yoy, Some(114.0));
    }

    #[test]
    fn items_keep_first_appearance_order_and_null_yoy() {
        let data = vec![
            obs("2026-01-01", "Beta", 10.4, 0.0),
            obs("2026-01-01", "Alpha", 20.0, 30.0),
            obs("2026-01-02", "Beta", 10.4, 0.0),
        ];
        let items = item_summary(&data, ITEM_TARGET_REVENUE);
        let names: Vec<&str> = items.iter().map(|i| i.item.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Alpha"]);
        assert_eq!(items[0].revenue_current, 21.0);
        assert_eq!(items[0].yoy, None);
        assert_eq!(items[1].yoy, Some(66.7));
    }

    #[test]
    fn season_progress_rounds_to_two_decimals() {
        let p = season_progress(
            &[obs("2026-01-01", "A", 1_000_000.0, 900_000.4), obs("2026-01-02", "B", 250_000.0, 0.0)],
            SEASON_TARGET_REVENUE,
        );
        assert_eq!(p.total_current, 1_250_000.0);
        assert_eq!(p.total_prior, 900_000.0);
        assert_eq!(p.season_target, 7_500_000.0);
        assert_eq!(p.season_progress, 16.67);
    }

    #[test]
    fn snapshot_windows() {
        // Ten days in January, then two in February.
        let mut data: Vec<Observation> = (1..=10)
            .map(|d| obs(&format!("2026-01-{d:02}"), "A", 100.0, 80.0))
            .collect();
        data.push(obs("2026-02-01", "A", 50.0, 100.0));
        data.push(obs("2026-02-02", "B", 30.0, 0.0));

        let ytd = YtdWindow {
            start: DEFAULT_YTD_START.to_string(),
            end: "2026-01-31".to_string(),
        };
        let snap = yoy_snapshot(&data, Metric::Revenue, Some(&ytd)).unwrap();

        assert_eq!(snap.baseline, 100.0);
        // Last observation has no prior.
        assert_eq!(snap.yoy_pct.today, None);
        assert_eq!(snap.yoy_ratio.today, None);
        // Last 7: five January days + two February days.
        // current = 500 + 80 = 580, prior = 400 + 100 = 500.
        assert_eq!(snap.yoy_pct.week, Some(116.0));
        assert_eq!(snap.yoy_ratio.week, Some(1.16));
        // February: 80 / 100.
        assert_eq!(snap.yoy_pct.month, Some(80.0));
        // YTD through January: 1000 / 800.
        assert_eq!(snap.yoy_pct.ytd, Some(125.0));
        assert_eq!(snap.yoy_ratio.ytd, Some(1.25));
    }

    #[test]
    fn snapshot_without_end_date_has_no_ytd() {
        let data = vec![obs("2026-01-01", "A", 100.0, 50.0)];
        let snap = yoy_snapshot(&data, Metric::Profit, None).unwrap();
        assert_eq!(snap.yoy_pct.today, Some(200.0));
        assert_eq!(snap.yoy_pct.ytd, None);
        assert_eq!(snap.metric, Metric::Profit);
    }

    #[test]
    fn snapshot_of_empty_set_is_all_none() {
        let ytd = YtdWindow {
            start: DEFAULT_YTD_START.to_string(),
            end: "2026-12-31".to_string(),
        };
        let snap = yoy_snapshot(&[], Metric::Revenue, Some(&ytd)).unwrap();
        assert_eq!(snap.yoy_pct, Windows::default());
        assert_eq!(snap.yoy_ratio, Windows::default());
    }
}
