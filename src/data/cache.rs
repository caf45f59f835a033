//! Short-lived dataset cache.
//!
//! The merged dataset is cached for `ttl` and reloaded early when either
//! source file's size or mtime changes. Readers get an `Arc` snapshot, so a
//! refresh never mutates data another query is still using.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::data::source::Fingerprint;
use crate::domain::Dataset;
use crate::error::AppError;

/// Default TTL in milliseconds.
pub const DEFAULT_CACHE_TTL_MS: u64 = 1_000;

/// One published dataset plus when and from what it was loaded.
#[derive(Debug)]
pub struct CachedDataset {
    pub dataset: Arc<Dataset>,
    pub loaded_at: DateTime<Utc>,
    refreshed: Instant,
    fingerprint: Fingerprint,
}

impl CachedDataset {
    fn is_fresh(&self, now: Instant, ttl: Duration, fingerprint: &Fingerprint) -> bool {
        now.saturating_duration_since(self.refreshed) < ttl && self.fingerprint == *fingerprint
    }
}

#[derive(Debug)]
pub struct DatasetCache {
    ttl: Duration,
    state: RwLock<Option<Arc<CachedDataset>>>,
}

impl DatasetCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current entry, fresh or not.
    pub fn get(&self) -> Option<Arc<CachedDataset>> {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Return the cached dataset, reloading it with `load` when missing,
    /// older than the TTL, or built from different files.
    ///
    /// `load` runs without holding the lock. On failure the previous entry is
    /// kept and the error is returned.
    pub fn refresh_if_stale<F>(
        &self,
        now: Instant,
        fingerprint: Fingerprint,
        load: F,
    ) -> Result<Arc<CachedDataset>, AppError>
    where
        F: FnOnce() -> Result<Dataset, AppError>,
    {
        if let Some(entry) = self.get() {
            if entry.is_fresh(now, self.ttl, &fingerprint) {
                return Ok(entry);
            }
            tracing::debug!("dataset cache stale; reloading");
        }

        let dataset = load().inspect_err(|e| {
            tracing::warn!(kind = e.kind().as_str(), "dataset reload failed: {e}");
        })?;

        let entry = Arc::new(CachedDataset {
            dataset: Arc::new(dataset),
            loaded_at: Utc::now(),
            refreshed: now,
            fingerprint,
        });
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::clone(&entry));
        Ok(entry)
    }

    /// Drop the cached entry; the next query reloads.
    pub fn invalidate(&self) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
