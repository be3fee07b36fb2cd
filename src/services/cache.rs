use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::core::CatalogSnapshot;
use crate::services::catalog::CatalogError;

/// In-memory cache of published catalog snapshots
///
/// Snapshots are stored behind `Arc` and only inserted once fully built, so
/// readers never observe a partial snapshot. Concurrent misses for the same
/// key share a single build.
#[derive(Clone)]
pub struct SnapshotCache {
    snapshots: moka::future::Cache<String, Arc<CatalogSnapshot>>,
    ttl_secs: u64,
}

impl SnapshotCache {
    /// Create a new snapshot cache
    pub fn new(max_snapshots: u64, ttl_secs: u64) -> Self {
        let snapshots = moka::future::CacheBuilder::new(max_snapshots)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            snapshots,
            ttl_secs,
        }
    }

    /// Return the cached snapshot for `key`, building and publishing it on a miss
    pub async fn get_or_build<F>(
        &self,
        key: &str,
        build: F,
    ) -> Result<Arc<CatalogSnapshot>, Arc<CatalogError>>
    where
        F: Future<Output = Result<CatalogSnapshot, CatalogError>>,
    {
        if let Some(snapshot) = self.snapshots.get(key).await {
            tracing::trace!("Snapshot cache hit: {}", key);
            return Ok(snapshot);
        }

        tracing::debug!("Snapshot cache miss: {}", key);

        self.snapshots
            .try_get_with(key.to_string(), async move { build.await.map(Arc::new) })
            .await
    }

    /// Return the cached snapshot without building
    pub async fn get(&self, key: &str) -> Option<Arc<CatalogSnapshot>> {
        self.snapshots.get(key).await
    }

    /// Drop a snapshot so that the next request rebuilds it
    pub async fn invalidate(&self, key: &str) {
        self.snapshots.invalidate(key).await;
        tracing::debug!("Invalidated snapshot: {}", key);
    }

    /// Get cache statistics, after applying pending evictions
    pub async fn stats(&self) -> CacheStats {
        self.snapshots.run_pending_tasks().await;
        CacheStats {
            cached_snapshots: self.snapshots.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub cached_snapshots: u64,
    pub ttl_secs: u64,
}
