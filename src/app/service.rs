//! Long-lived query service: config + dataset cache + pipeline.

use std::sync::Arc;
use std::time::Instant;

use crate::app::pipeline::run_query;
use crate::config::DashboardConfig;
use crate::data::{CachedDataset, DatasetCache, fingerprint, load_pair};
use crate::domain::{Query, QueryKind, Response};
use crate::error::AppError;

/// Owns the cache for as long as the process answers queries.
#[derive(Debug)]
pub struct DashboardService {
    config: DashboardConfig,
    cache: DatasetCache,
}

impl DashboardService {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = DatasetCache::new(config.cache_ttl);
        Self { config, cache }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The merged dataset, reloaded if the cache entry is stale.
    pub fn dataset(&self) -> Result<Arc<CachedDataset>, AppError> {
        let (current, prior) = (&self.config.current, &self.config.prior);
        self.cache
            .refresh_if_stale(Instant::now(), fingerprint(current, prior), || load_pair(current, prior))
    }

    pub fn execute(&self, kind: QueryKind, query: &Query) -> Result<Response, AppError> {
        let span = tracing::info_span!("query", kind = kind.as_str(), unit = query.unit.as_str(), metric = query.metric.as_str());
        let _enter = span.enter();

        let result = self
            .dataset()
            .and_then(|entry| run_query(&entry.dataset, entry.loaded_at, kind, query, &self.config));

        match &result {
            Ok(_) => tracing::debug!("query answered"),
            Err(e) => tracing::warn!(error_kind = e.kind().as_str(), "query failed: {e}"),
        }
        result
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}
