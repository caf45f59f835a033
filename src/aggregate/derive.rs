//! Per-bucket YoY and running totals.

use crate::aggregate::bucket::bucket;
use crate::domain::{BASELINE_PCT, Bucket, DerivedPoint, Observation, Query, SeriesMeta, TimeSeries};
use crate::error::AppError;
use crate::math::{round_int, yoy_pct, yoy_ratio};

/// Derive YoY pct/ratio and cumulative totals in one forward pass.
///
/// Running sums stay unrounded internally; only the emitted cumulative values
/// are rounded to integers.
pub fn derive(buckets: &[Bucket]) -> Vec<DerivedPoint> {
    let mut cumulative_current = 0.0;
    let mut cumulative_prior = 0.0;

    buckets
        .iter()
        .map(|b| {
            cumulative_current += b.value_current;
            cumulative_prior += b.value_prior;

            let pct = yoy_pct(b.value_current, b.value_prior);
            DerivedPoint {
                label: b.label.clone(),
                value_current: b.value_current,
                value_prior: b.value_prior,
                yoy_pct: pct,
                yoy_ratio: yoy_ratio(pct),
                cumulative_current: round_int(cumulative_current),
                cumulative_prior: round_int(cumulative_prior),
            }
        })
        .collect()
}

/// Bucket an already-filtered, date-sorted observation set and derive the series.
pub fn build_timeseries(filtered: &[Observation], query: &Query) -> Result<TimeSeries, AppError> {
    let buckets = bucket(filtered, query.unit, query.metric)?;
    Ok(TimeSeries {
        meta: SeriesMeta {
            unit: query.unit,
            metric: query.metric,
            start: query.filter.start.clone(),
            end: query.filter.end.clone(),
            season: query.filter.season.clone(),
            item: query.filter.item.clone(),
            baseline: BASELINE_PCT,
        },
        points: derive(&buckets),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Filter, Metric, Unit};

    fn b(label: &str, cur: f64, prior: f64) -> Bucket {
        Bucket {
            label: label.to_string(),
            value_current: cur,
            value_prior: prior,
        }
    }

    fn obs(date: &str, cur: f64, prior: f64) -> Observation {
        Observation {
            date: date.to_string(),
            season: "S".to_string(),
            item: "A".to_string(),
            revenue_current: cur,
            revenue_prior: prior,
            profit_current: 0.0,
            profit_prior: 0.0,
        }
    }

    #[test]
    fn two_day_scenario() {
        let query = Query {
            filter: Filter::default(),
            unit: Unit::Day,
            metric: Metric::Revenue,
        };
        let series =
            build_timeseries(&[obs("2026-01-01", 100.0, 50.0), obs("2026-01-02", 200.0, 0.0)], &query).unwrap();

        let p = &series.points;
        assert_eq!(p.len(), 2);
        assert_eq!(p[0].label, "2026-01-01");
        assert_eq!(p[0].yoy_pct, Some(200.0));
        assert_eq!(p[0].yoy_ratio, Some(2.0));
        assert_eq!(p[0].cumulative_current, 100.0);
        assert_eq!(p[0].cumulative_prior, 50.0);

        assert_eq!(p[1].yoy_pct, None);
        assert_eq!(p[1].yoy_ratio, None);
        assert_eq!(p[1].cumulative_current, 300.0);
        assert_eq!(p[1].cumulative_prior, 50.0);
        assert_eq!(series.meta.baseline, 100.0);
    }

    #[test]
    fn null_rule_and_ratio_consistency() {
        let buckets = vec![
            b("a", 10.0, 0.0),
            b("b", 1.0, 3.0),
            b("c", 123.456, 78.9),
            b("d", 0.0, 5.0),
            b("e", 7.0, 0.0),
        ];
        for p in derive(&buckets) {
            if p.value_prior == 0.0 {
                assert_eq!(p.yoy_pct, None);
                assert_eq!(p.yoy_ratio, None);
            } else {
                let pct = p.yoy_pct.unwrap();
                assert_eq!(p.yoy_ratio, Some(crate::math::round_to(pct / 100.0, 4)));
            }
        }
    }

    #[test]
    fn cumulative_rounds_only_on_emission() {
        // Three buckets of 0.4: unrounded sum is 1.2 -> 1, not 0 + 0 + 0.
        let buckets = vec![b("a", 0.4, 0.4), b("b", 0.4, 0.4), b("c", 0.4, 0.4)];
        let out = derive(&buckets);
        assert_eq!(out[0].cumulative_current, 0.0);
        assert_eq!(out[1].cumulative_current, 1.0);
        assert_eq!(out[2].cumulative_current, 1.0);
    }

    #[test]
    fn cumulative_is_monotone_for_non_negative_values() {
        let buckets: Vec<Bucket> = (0..50)
            .map(|i| b(&format!("W{i}"), (i % 7) as f64 * 13.7, (i % 5) as f64 * 9.1))
            .collect();
        let out = derive(&buckets);
        for pair in out.windows(2) {
            assert!(pair[1].cumulative_current >= pair[0].cumulative_current);
            assert!(pair[1].cumulative_prior >= pair[0].cumulative_prior);
        }
    }

    #[test]
    fn empty_buckets_give_empty_series() {
        assert!(derive(&[]).is_empty());
    }
}
