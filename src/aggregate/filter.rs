//! Record predicates.

use crate::domain::{Filter, Observation, is_all};

/// Apply every predicate in `filter` and return a date-sorted subset.
///
/// All predicates are evaluated together per observation, so the result does
/// not depend on any application order. The sort is stable: observations on
/// the same date keep their input order.
pub fn filter(observations: &[Observation], filter: &Filter) -> Vec<Observation> {
    let mut out: Vec<Observation> = observations
        .iter()
        .filter(|o| matches(o, filter))
        .cloned()
        .collect();
    out.sort_by(|a, b| a.date.cmp(&b.date));
    out
}

/// `true` if `obs` passes every predicate in `filter`.
pub fn matches(obs: &Observation, filter: &Filter) -> bool {
    // Dates are fixed-width `YYYY-MM-DD`, so byte order is calendar order.
    if let Some(start) = filter.start.as_deref() {
        if obs.date.as_str() < start {
            return false;
        }
    }
    if let Some(end) = filter.end.as_deref() {
        if obs.date.as_str() > end {
            return false;
        }
    }
    matches_dimension(&obs.season, filter.season.as_deref())
        && matches_dimension(&obs.item, filter.item.as_deref())
}

fn matches_dimension(value: &str, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(w) if is_all(w) => true,
        Some(w) => value == w,
    }
}
