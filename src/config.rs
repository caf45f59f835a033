//! Runtime configuration.
//!
//! Resolution order, lowest to highest: built-in defaults, `.env`, process
//! environment, CLI flags.

use std::time::Duration;

use chrono::NaiveDate;

use crate::aggregate::{DEFAULT_YTD_START, ITEM_TARGET_REVENUE, SEASON_TARGET_REVENUE};
use crate::data::{DEFAULT_CACHE_TTL_MS, Source};
use crate::error::AppError;

pub const ENV_CURRENT_CSV: &str = "SALES_CURRENT_CSV";
pub const ENV_PRIOR_CSV: &str = "SALES_PRIOR_CSV";
pub const ENV_ITEM_TARGET: &str = "SALES_ITEM_TARGET";
pub const ENV_SEASON_TARGET: &str = "SALES_SEASON_TARGET";
pub const ENV_YTD_START: &str = "SALES_YTD_START";
pub const ENV_CACHE_TTL_MS: &str = "SALES_CACHE_TTL_MS";

pub const DEFAULT_CURRENT_CSV: &str = "data/sales_2026.csv";
pub const DEFAULT_PRIOR_CSV: &str = "data/sales_2025.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub current: Source,
    pub prior: Source,
    pub item_target: f64,
    pub season_target: f64,
    /// `YYYY-MM-DD`; the YTD window runs from here to the query's end date.
    pub ytd_start: String,
    pub cache_ttl: Duration,
}

/// Values supplied on the command line; `None` keeps the env/default value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub current: Option<String>,
    pub prior: Option<String>,
    pub item_target: Option<f64>,
    pub season_target: Option<f64>,
    pub ytd_start: Option<String>,
    pub cache_ttl_ms: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            current: Source::parse(DEFAULT_CURRENT_CSV),
            prior: Source::parse(DEFAULT_PRIOR_CSV),
            item_target: ITEM_TARGET_REVENUE,
            season_target: SEASON_TARGET_REVENUE,
            ytd_start: DEFAULT_YTD_START.to_string(),
            cache_ttl: Duration::from_millis(DEFAULT_CACHE_TTL_MS),
        }
    }
}

impl DashboardConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let config = Self {
            current: get(ENV_CURRENT_CSV).map(|s| Source::parse(&s)).unwrap_or(defaults.current),
            prior: get(ENV_PRIOR_CSV).map(|s| Source::parse(&s)).unwrap_or(defaults.prior),
            item_target: match get(ENV_ITEM_TARGET) {
                Some(v) => parse_number(ENV_ITEM_TARGET, &v)?,
                None => defaults.item_target,
            },
            season_target: match get(ENV_SEASON_TARGET) {
                Some(v) => parse_number(ENV_SEASON_TARGET, &v)?,
                None => defaults.season_target,
            },
            ytd_start: get(ENV_YTD_START).unwrap_or(defaults.ytd_start),
            cache_ttl: match get(ENV_CACHE_TTL_MS) {
                Some(v) => Duration::from_millis(
                    v.parse::<u64>()
                        .map_err(|_| AppError::config(format!("{ENV_CACHE_TTL_MS} must be a whole number of ms, got '{v}'.")))?,
                ),
                None => defaults.cache_ttl,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides and re-validate.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, AppError> {
        if let Some(s) = &overrides.current {
            self.current = Source::parse(s);
        }
        if let Some(s) = &overrides.prior {
            self.prior = Source::parse(s);
        }
        if let Some(v) = overrides.item_target {
            self.item_target = v;
        }
        if let Some(v) = overrides.season_target {
            self.season_target = v;
        }
        if let Some(s) = &overrides.ytd_start {
            self.ytd_start = s.trim().to_string();
        }
        if let Some(ms) = overrides.cache_ttl_ms {
            self.cache_ttl = Duration::from_millis(ms);
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), AppError> {
        for (name, v) in [("item target", self.item_target), ("season target", self.season_target)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(AppError::config(format!("The {name} must be a positive number, got {v}.")));
            }
        }
        if self.ytd_start.len() != 10 || NaiveDate::parse_from_str(&self.ytd_start, "%Y-%m-%d").is_err() {
            return Err(AppError::config(format!(
                "Invalid YTD start '{}'. Expected YYYY-MM-DD.",
                self.ytd_start
            )));
        }
        Ok(())
    }
}

fn parse_number(key: &str, v: &str) -> Result<f64, AppError> {
    v.parse::<f64>()
        .map_err(|_| AppError::config(format!("{key} must be a number, got '{v}'.")))
}
