//! Query parameters and their validation.
//!
//! Every entry point (CLI flags, `watch`, library callers) hands raw strings to
//! [`Query::parse`], so unit/metric/date validation happens in exactly one place.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{Metric, Unit};
use crate::error::AppError;

/// Season/item values that mean "no predicate".
///
/// `전체` ("all") is what dashboard dropdowns send.
const ALL_SENTINELS: [&str; 2] = ["all", "전체"];

/// Raw, unvalidated query parameters as received from a presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub season: Option<String>,
    pub item: Option<String>,
    pub unit: Option<String>,
    pub metric: Option<String>,
}

/// Optional record predicates, ANDed together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub start: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub end: Option<String>,
    pub season: Option<String>,
    pub item: Option<String>,
}

impl Filter {
    /// Same predicates with the item filter dropped (used by the item summary).
    pub fn without_item(&self) -> Self {
        Self {
            item: None,
            ..self.clone()
        }
    }
}

/// Which view a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Items,
    Progress,
    Yoy,
    Timeseries,
    Dashboard,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Items => "items",
            QueryKind::Progress => "progress",
            QueryKind::Yoy => "yoy",
            QueryKind::Timeseries => "timeseries",
            QueryKind::Dashboard => "dashboard",
        }
    }
}

/// A validated query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub filter: Filter,
    pub unit: Unit,
    pub metric: Metric,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            unit: Unit::Day,
            metric: Metric::Revenue,
        }
    }
}

impl Query {
    /// Validate raw parameters.
    ///
    /// Absent `unit`/`metric` default to `day`/`revenue`; a value that is present
    /// but unknown is an `InvalidParameter` error. Blank strings count as absent.
    pub fn parse(params: &QueryParams) -> Result<Self, AppError> {
        let unit = match non_blank(params.unit.as_deref()) {
            Some(s) => s.parse::<Unit>()?,
            None => Unit::Day,
        };
        let metric = match non_blank(params.metric.as_deref()) {
            Some(s) => s.parse::<Metric>()?,
            None => Metric::Revenue,
        };

        let start = non_blank(params.start.as_deref())
            .map(|s| parse_bound("start", s))
            .transpose()?;
        let end = non_blank(params.end.as_deref())
            .map(|s| parse_bound("end", s))
            .transpose()?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AppError::invalid_parameter(format!(
                    "Invalid date range: start {s} is after end {e}."
                )));
            }
        }

        let filter = Filter {
            start: start.map(|d| d.format("%Y-%m-%d").to_string()),
            end: end.map(|d| d.format("%Y-%m-%d").to_string()),
            season: dimension(params.season.as_deref()),
            item: dimension(params.item.as_deref()),
        };

        Ok(Self { filter, unit, metric })
    }
}

/// `true` for season/item values that mean "no predicate".
pub fn is_all(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || ALL_SENTINELS.iter().any(|all| s.eq_ignore_ascii_case(all))
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Normalize a season/item parameter; "all" sentinels become `None`.
fn dimension(s: Option<&str>) -> Option<String> {
    let s = non_blank(s)?;
    if is_all(s) {
        return None;
    }
    Some(s.to_string())
}

fn parse_bound(name: &str, s: &str) -> Result<NaiveDate, AppError> {
    // Bounds are compared lexically against record dates, so only the
    // fixed-width ISO form is accepted.
    if s.len() != 10 {
        return Err(AppError::invalid_parameter(format!(
            "Invalid `{name}` date '{s}'. Expected YYYY-MM-DD."
        )));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        AppError::invalid_parameter(format!("Invalid `{name}` date '{s}'. Expected YYYY-MM-DD."))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn params() -> QueryParams {
        QueryParams::default()
    }

    #[test]
    fn defaults_to_day_and_revenue() {
        let q = Query::parse(&params()).unwrap();
        assert_eq!(q.unit, Unit::Day);
        assert_eq!(q.metric, Metric::Revenue);
        assert_eq!(q.filter, Filter::default());
    }

    #[test]
    fn all_sentinels_mean_no_predicate() {
        let q = Query::parse(&QueryParams {
            season: Some("전체".to_string()),
            item: Some("ALL".to_string()),
            ..params()
        })
        .unwrap();
        assert_eq!(q.filter.season, None);
        assert_eq!(q.filter.item, None);
    }

    #[test]
    fn rejects_unknown_unit_instead_of_defaulting() {
        let err = Query::parse(&QueryParams {
            unit: Some("quarter".to_string()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn rejects_malformed_and_inverted_dates() {
        for bad in ["2026-1-5", "2026/01/05", "yesterday", "2026-02-30"] {
            let err = Query::parse(&QueryParams {
                start: Some(bad.to_string()),
                ..params()
            })
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter, "{bad}");
        }

        let err = Query::parse(&QueryParams {
            start: Some("2026-02-01".to_string()),
            end: Some("2026-01-01".to_string()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn without_item_keeps_other_predicates() {
        let f = Filter {
            start: Some("2026-01-01".to_string()),
            end: None,
            season: Some("2026 S/S".to_string()),
            item: Some("Alpha".to_string()),
        };
        let g = f.without_item();
        assert_eq!(g.item, None);
        assert_eq!(g.season.as_deref(), Some("2026 S/S"));
        assert_eq!(g.start.as_deref(), Some("2026-01-01"));
    }
}
