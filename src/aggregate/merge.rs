//! Reconcile the current-year and prior-year sources into one observation set.
//!
//! The current-year file is the iteration base. Each current row is paired with
//! the prior row sharing its `(date, season, item)` key; prior rows whose key
//! never appears in the current file are appended with zeroed current figures,
//! so prior-year activity is never dropped.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::{Dataset, DatasetStats, Observation, ObservationKey, RawYearRow, RowError};

/// Parsed figures for one row of one year.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct YearFigures {
    revenue: f64,
    profit: f64,
}

impl YearFigures {
    fn from_row(row: &RawYearRow) -> Self {
        let revenue = parse_amount(&row.revenue);
        let cogs = parse_amount(&row.cogs);
        let discount = parse_amount(&row.discount);
        Self {
            revenue,
            profit: revenue - cogs - discount,
        }
    }
}

/// Parse a numeric cell; anything unparsable, empty, or non-finite is `0`.
pub fn parse_amount(s: &str) -> f64 {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Merge both years into observations with unique `(date, season, item)` keys.
///
/// Output order: current rows in input order, then prior-only rows in input
/// order. Callers that need date order go through the filter stage.
///
/// Duplicate keys inside the current file are folded into the first
/// occurrence (figures summed). Duplicate keys inside the prior file resolve to
/// the last occurrence.
pub fn merge(current: &[RawYearRow], prior: &[RawYearRow]) -> Vec<Observation> {
    let prior_by_key: HashMap<ObservationKey, &RawYearRow> =
        prior.iter().map(|row| (ObservationKey::of(row), row)).collect();

    let mut out: Vec<Observation> = Vec::with_capacity(current.len().max(prior_by_key.len()));
    let mut seen: HashMap<ObservationKey, usize> = HashMap::with_capacity(out.capacity());

    for row in current {
        let key = ObservationKey::of(row);
        let cur = YearFigures::from_row(row);

        if let Some(&idx) = seen.get(&key) {
            let obs = &mut out[idx];
            obs.revenue_current += cur.revenue;
            obs.profit_current += cur.profit;
            continue;
        }

        let prev = prior_by_key
            .get(&key)
            .map(|r| YearFigures::from_row(r))
            .unwrap_or_default();

        out.push(observation(row, cur, prev));
        seen.insert(key, out.len() - 1);
    }

    for row in prior {
        let key = ObservationKey::of(row);
        if seen.contains_key(&key) {
            continue;
        }
        let source = prior_by_key.get(&key).copied().unwrap_or(row);
        let prev = YearFigures::from_row(source);

        out.push(observation(source, YearFigures::default(), prev));
        seen.insert(key, out.len() - 1);
    }

    out
}

fn observation(row: &RawYearRow, cur: YearFigures, prev: YearFigures) -> Observation {
    Observation {
        date: row.date.clone(),
        season: row.season.clone(),
        item: row.item.clone(),
        revenue_current: cur.revenue,
        revenue_prior: prev.revenue,
        profit_current: cur.profit,
        profit_prior: prev.profit,
    }
}

/// Merge both years and collect dataset-level stats.
pub fn merge_dataset(current: &[RawYearRow], prior: &[RawYearRow], row_errors: Vec<RowError>) -> Dataset {
    let observations = merge(current, prior);

    let current_keys: HashSet<ObservationKey> = current.iter().map(ObservationKey::of).collect();
    let prior_only = observations
        .iter()
        .filter(|o| !current_keys.contains(&o.key()))
        .count();

    let seasons: BTreeSet<&str> = observations.iter().map(|o| o.season.as_str()).collect();
    let items: BTreeSet<&str> = observations.iter().map(|o| o.item.as_str()).collect();

    let stats = DatasetStats {
        rows_current: current.len(),
        rows_prior: prior.len(),
        observations: observations.len(),
        prior_only,
        first_date: observations.iter().map(|o| &o.date).min().cloned(),
        last_date: observations.iter().map(|o| &o.date).max().cloned(),
        seasons: seasons.into_iter().map(str::to_string).collect(),
        items: items.into_iter().map(str::to_string).collect(),
    };

    Dataset {
        observations,
        stats,
        row_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, season: &str, item: &str, revenue: &str, cogs: &str, discount: &str) -> RawYearRow {
        RawYearRow {
            date: date.to_string(),
            season: season.to_string(),
            item: item.to_string(),
            msrp: "0".to_string(),
            revenue: revenue.to_string(),
            cogs: cogs.to_string(),
            discount: discount.to_string(),
        }
    }

    #[test]
    fn pairs_matching_keys_and_computes_profit() {
        let current = vec![row("2026-01-01", "S", "A", "100", "40", "10")];
        let prior = vec![row("2026-01-01", "S", "A", "80", "30", "5")];

        let merged = merge(&current, &prior);
        assert_eq!(merged.len(), 1);
        let o = &merged[0];
        assert_eq!(o.revenue_current, 100.0);
        assert_eq!(o.revenue_prior, 80.0);
        assert_eq!(o.profit_current, 50.0);
        assert_eq!(o.profit_prior, 45.0);
    }

    #[test]
    fn current_only_rows_get_zero_prior() {
        let current = vec![row("2026-01-02", "S", "A", "100", "40", "10")];
        let merged = merge(&current, &[]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].revenue_prior, 0.0);
        assert_eq!(merged[0].profit_prior, 0.0);
    }

    #[test]
    fn prior_only_rows_are_synthesized_with_zero_current() {
        let current = vec![row("2026-01-01", "S", "A", "100", "0", "0")];
        let prior = vec![
            row("2026-01-01", "S", "A", "90", "0", "0"),
            row("2026-01-01", "S", "B", "70", "20", "0"),
        ];

        let merged = merge(&current, &prior);
        assert_eq!(merged.len(), 2);
        let b = merged.iter().find(|o| o.item == "B").unwrap();
        assert_eq!(b.revenue_current, 0.0);
        assert_eq!(b.profit_current, 0.0);
        assert_eq!(b.revenue_prior, 70.0);
        assert_eq!(b.profit_prior, 50.0);
    }

    #[test]
    fn every_key_appears_exactly_once() {
        let current = vec![
            row("2026-01-01", "S", "A", "1", "", ""),
            row("2026-01-01", "S", "B", "2", "", ""),
            row("2026-01-02", "F", "A", "3", "", ""),
            row("2026-01-01", "S", "A", "4", "", ""),
        ];
        let prior = vec![
            row("2026-01-01", "S", "B", "5", "", ""),
            row("2026-01-03", "F", "C", "6", "", ""),
            row("2026-01-03", "F", "C", "7", "", ""),
        ];

        let merged = merge(&current, &prior);

        let expected: HashSet<ObservationKey> =
            current.iter().chain(prior.iter()).map(ObservationKey::of).collect();
        let keys: Vec<ObservationKey> = merged.iter().map(Observation::key).collect();
        let unique: HashSet<ObservationKey> = keys.iter().cloned().collect();

        assert_eq!(keys.len(), unique.len());
        assert_eq!(unique, expected);

        let a = merged.iter().find(|o| o.item == "A" && o.season == "S").unwrap();
        assert_eq!(a.revenue_current, 5.0);
        let c = merged.iter().find(|o| o.item == "C").unwrap();
        assert_eq!(c.revenue_prior, 7.0);
    }

    #[test]
    fn unparsable_cells_behave_like_zero() {
        let bad = merge(
            &[row("2026-01-01", "S", "A", "12x", "n/a", "")],
            &[row("2026-01-01", "S", "A", "NaN", "inf", "  ")],
        );
        let zero = merge(
            &[row("2026-01-01", "S", "A", "0", "0", "0")],
            &[row("2026-01-01", "S", "A", "0", "0", "0")],
        );
        assert_eq!(bad, zero);
    }

    #[test]
    fn dataset_stats_count_prior_only_keys() {
        let current = vec![row("2026-01-02", "S", "A", "1", "", "")];
        let prior = vec![
            row("2026-01-02", "S", "A", "1", "", ""),
            row("2026-01-01", "F", "B", "1", "", ""),
        ];
        let ds = merge_dataset(&current, &prior, Vec::new());
        assert_eq!(ds.stats.observations, 2);
        assert_eq!(ds.stats.prior_only, 1);
        assert_eq!(ds.stats.first_date.as_deref(), Some("2026-01-01"));
        assert_eq!(ds.stats.last_date.as_deref(), Some("2026-01-02"));
        assert_eq!(ds.stats.seasons, vec!["F", "S"]);
        assert_eq!(ds.stats.items, vec!["A", "B"]);
    }
}
