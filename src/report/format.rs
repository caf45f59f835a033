//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (snapshot tests live here)
//!
//! Missing values (no prior-year base) print as `-`.

use crate::domain::{
    DashboardResponse, DatasetStats, ItemSummary, ItemsResponse, ProgressResponse, Response, TimeseriesResponse,
    Windows, YoyResponse, YoySnapshot,
};

const MISSING: &str = "-";

/// Format any response as text.
pub fn format_response(response: &Response) -> String {
    match response {
        Response::Items(r) => format_items(r),
        Response::Progress(r) => format_progress(r),
        Response::Yoy(r) => format_yoy(r),
        Response::Timeseries(r) => format_timeseries(r),
        Response::Dashboard(r) => format_dashboard(r),
    }
}

pub fn format_items(r: &ItemsResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Items (loaded {}) ===\n", fmt_loaded(r.loaded_at)));
    out.push_str(&items_table(&r.items));
    out
}

pub fn format_progress(r: &ProgressResponse) -> String {
    let p = &r.progress;
    let mut out = String::new();
    out.push_str(&format!("=== Season progress (loaded {}) ===\n", fmt_loaded(r.loaded_at)));
    out.push_str(&format!("Current total : {}\n", fmt_amount(Some(p.total_current))));
    out.push_str(&format!("Prior total   : {}\n", fmt_amount(Some(p.total_prior))));
    out.push_str(&format!("Season target : {}\n", fmt_amount(Some(p.season_target))));
    out.push_str(&format!("Progress      : {}\n", fmt_pct(Some(p.season_progress), 2)));
    out
}

pub fn format_yoy(r: &YoyResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== YoY {} (loaded {}) ===\n",
        r.snapshot.metric.as_str(),
        fmt_loaded(r.loaded_at)
    ));
    out.push_str(&snapshot_table(&r.snapshot));
    out
}

pub fn format_timeseries(r: &TimeseriesResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== {} by {} (loaded {}) ===\n",
        r.meta.metric.as_str(),
        r.meta.unit.as_str(),
        fmt_loaded(r.loaded_at)
    ));
    out.push_str(&format!("Filters: {}\n", fmt_filters(&r.meta.start, &r.meta.end, &r.meta.season, &r.meta.item)));
    out.push_str(&series_table(r));
    out
}

pub fn format_dashboard(r: &DashboardResponse) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Dashboard (loaded {}) ===\n", fmt_loaded(r.loaded_at)));
    out.push_str(&format_stats(&r.stats));

    let p = &r.progress;
    out.push_str(&format!(
        "\nSeason: {} of {} ({}) | prior {}\n",
        fmt_amount(Some(p.total_current)),
        fmt_amount(Some(p.season_target)),
        fmt_pct(Some(p.season_progress), 2),
        fmt_amount(Some(p.total_prior)),
    ));

    out.push_str(&format!("\nYoY ({}):\n", r.yoy.metric.as_str()));
    out.push_str(&snapshot_table(&r.yoy));

    out.push_str("\nItems:\n");
    out.push_str(&items_table(&r.items));

    out.push_str(&format!("\nSeries ({} by {}):\n", r.timeseries.meta.metric.as_str(), r.timeseries.meta.unit.as_str()));
    out.push_str(&series_table(&r.timeseries));

    if let Some(item_ts) = &r.item_timeseries {
        out.push_str(&format!("\nSeries for {}:\n", item_ts.meta.item.as_deref().unwrap_or(MISSING)));
        out.push_str(&series_table(item_ts));
    }

    out
}

pub fn format_stats(stats: &DatasetStats) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Rows: current={} prior={} | observations={} (prior-only {})\n",
        stats.rows_current, stats.rows_prior, stats.observations, stats.prior_only
    ));
    out.push_str(&format!(
        "Dates: {} .. {}\n",
        stats.first_date.as_deref().unwrap_or(MISSING),
        stats.last_date.as_deref().unwrap_or(MISSING)
    ));
    out.push_str(&format!("Seasons: {}\n", join_or_missing(&stats.seasons)));
    out.push_str(&format!("Items: {}\n", join_or_missing(&stats.items)));
    out
}

fn items_table(items: &[ItemSummary]) -> String {
    let mut out = String::new();
    push_row(&mut out, format!("{:<24} {:>14} {:>14} {:>9} {:>9}", "item", "current", "prior", "yoy", "progress"));
    push_row(&mut out, format!("{:-<24} {:-<14} {:-<14} {:-<9} {:-<9}", "", "", "", "", ""));
    for i in items {
        push_row(
            &mut out,
            format!(
                "{:<24} {:>14} {:>14} {:>9} {:>9}",
                truncate(&i.item, 24),
                fmt_amount(Some(i.revenue_current)),
                fmt_amount(Some(i.revenue_prior)),
                fmt_pct(i.yoy, 1),
                fmt_pct(Some(i.progress), 1),
            ),
        );
    }
    out
}

fn snapshot_table(s: &YoySnapshot) -> String {
    let mut out = String::new();
    push_row(&mut out, format!("{:<8} {:>10} {:>8}", "window", "yoy_pct", "ratio"));
    push_row(&mut out, format!("{:-<8} {:-<10} {:-<8}", "", "", ""));
    for (name, pct, ratio) in windows(&s.yoy_pct, &s.yoy_ratio) {
        push_row(&mut out, format!("{:<8} {:>10} {:>8}", name, fmt_pct(pct, 2), fmt_ratio(ratio)));
    }
    push_row(&mut out, format!("(baseline {:.0})", s.baseline));
    out
}

fn windows(pct: &Windows, ratio: &Windows) -> [(&'static str, Option<f64>, Option<f64>); 4] {
    [
        ("today", pct.today, ratio.today),
        ("week", pct.week, ratio.week),
        ("month", pct.month, ratio.month),
        ("ytd", pct.ytd, ratio.ytd),
    ]
}

fn series_table(r: &TimeseriesResponse) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!(
            "{:<12} {:>14} {:>14} {:>9} {:>8} {:>15} {:>15}",
            "bucket", "current", "prior", "yoy", "ratio", "cum_current", "cum_prior"
        ),
    );
    push_row(&mut out, format!("{:-<12} {:-<14} {:-<14} {:-<9} {:-<8} {:-<15} {:-<15}", "", "", "", "", "", "", ""));
    for p in &r.points {
        push_row(
            &mut out,
            format!(
                "{:<12} {:>14} {:>14} {:>9} {:>8} {:>15} {:>15}",
                p.label,
                fmt_amount(Some(p.value_current)),
                fmt_amount(Some(p.value_prior)),
                fmt_pct(p.yoy_pct, 2),
                fmt_ratio(p.yoy_ratio),
                fmt_amount(Some(p.cumulative_current)),
                fmt_amount(Some(p.cumulative_prior)),
            ),
        );
    }
    out
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

/// Whole currency units with thousands separators: `1,234,567`.
pub fn fmt_amount(v: Option<f64>) -> String {
    let Some(v) = v.filter(|v| v.is_finite()) else {
        return MISSING.to_string();
    };
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn fmt_pct(v: Option<f64>, decimals: usize) -> String {
    match v.filter(|v| v.is_finite()) {
        Some(v) => format!("{v:.decimals$}%"),
        None => MISSING.to_string(),
    }
}

pub fn fmt_ratio(v: Option<f64>) -> String {
    match v.filter(|v| v.is_finite()) {
        Some(v) => format!("{v:.4}"),
        None => MISSING.to_string(),
    }
}

fn fmt_loaded(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn fmt_filters(start: &Option<String>, end: &Option<String>, season: &Option<String>, item: &Option<String>) -> String {
    format!(
        "start={} end={} season={} item={}",
        start.as_deref().unwrap_or("*"),
        end.as_deref().unwrap_or("*"),
        season.as_deref().unwrap_or("all"),
        item.as_deref().unwrap_or("all"),
    )
}

fn join_or_missing(values: &[String]) -> String {
    if values.is_empty() {
        MISSING.to_string()
    } else {
        values.join(", ")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Metric;
    use chrono::{TimeZone, Utc};

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(fmt_amount(Some(0.0)), "0");
        assert_eq!(fmt_amount(Some(999.4)), "999");
        assert_eq!(fmt_amount(Some(1_234_567.0)), "1,234,567");
        assert_eq!(fmt_amount(Some(-12_000.0)), "-12,000");
        assert_eq!(fmt_amount(None), "-");
    }

    #[test]
    fn missing_percentages_print_as_dash() {
        assert_eq!(fmt_pct(Some(114.0), 1), "114.0%");
        assert_eq!(fmt_pct(None, 2), "-");
        assert_eq!(fmt_ratio(Some(1.16)), "1.1600");
        assert_eq!(fmt_ratio(None), "-");
    }

    #[test]
    fn items_snapshot() {
        let r = ItemsResponse {
            items: vec![
                ItemSummary {
                    item: "Item Alpha".to_string(),
                    revenue_current: 2_280_000.0,
                    revenue_prior: 2_000_000.0,
                    yoy: Some(114.0),
                    progress: 100.0,
                },
                ItemSummary {
                    item: "Item Zeta".to_string(),
                    revenue_current: 5_000.0,
                    revenue_prior: 0.0,
                    yoy: None,
                    progress: 0.2,
                },
            ],
            loaded_at: Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap(),
        };
        let expected = concat!(
            "=== Items (loaded 2026-01-31 09:00:00 UTC) ===\n",
            "item                            current          prior       yoy  progress\n",
            "------------------------ -------------- -------------- --------- ---------\n",
            "Item Alpha                    2,280,000      2,000,000    114.0%    100.0%\n",
            "Item Zeta                         5,000              0         -      0.2%\n",
        );
        assert_eq!(format_items(&r), expected);
    }

    #[test]
    fn snapshot_table_lists_every_window() {
        let s = YoySnapshot {
            baseline: 100.0,
            metric: Metric::Revenue,
            yoy_pct: Windows {
                today: None,
                week: Some(116.0),
                month: Some(80.0),
                ytd: Some(125.0),
            },
            yoy_ratio: Windows {
                today: None,
                week: Some(1.16),
                month: Some(0.8),
                ytd: Some(1.25),
            },
        };
        let txt = snapshot_table(&s);
        assert!(txt.contains("today             -        -\n"));
        assert!(txt.contains("week        116.00%   1.1600\n"));
        assert!(txt.ends_with("(baseline 100)\n"));
    }
}
