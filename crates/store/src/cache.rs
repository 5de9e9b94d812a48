use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use jobscout_protocol::{QueryFingerprint, SearchParams};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One persisted cache row. `last_refresh` is only ever advanced by a
/// successful background refresh; the read path never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub last_refresh: DateTime<Utc>,
    pub raw_params: SearchParams,
}

/// Staleness gate for background refreshes.
///
/// A fingerprint is stale when it was never seen, its TTL has elapsed, or
/// the current result set is thinner than the configured floor. Concurrent
/// duplicate triggers for one fingerprint within a TTL window are tolerated;
/// upserts are idempotent so the second refresh is wasted work, not a bug.
pub struct QueryCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    path: PathBuf,
}

impl QueryCache {
    pub fn new(path: impl AsRef<Path>, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Freshness decision for one request evaluation.
    pub fn is_fresh_enough(
        &self,
        fingerprint: &QueryFingerprint,
        min_result_floor: usize,
        current_result_count: usize,
        now: DateTime<Utc>,
    ) -> bool {
        if current_result_count < min_result_floor {
            return false;
        }
        match self.entries.get(&fingerprint.0) {
            Some(entry) => now - entry.last_refresh <= self.ttl,
            None => false,
        }
    }

    pub fn get(&self, fingerprint: &QueryFingerprint) -> Option<&CacheEntry> {
        self.entries.get(&fingerprint.0)
    }

    /// Record a successful background refresh for a fingerprint, creating
    /// the row on first sight.
    pub fn mark_refreshed(
        &mut self,
        fingerprint: &QueryFingerprint,
        params: &SearchParams,
        now: DateTime<Utc>,
    ) {
        self.entries.insert(
            fingerprint.0.clone(),
            CacheEntry {
                last_refresh: now,
                raw_params: params.clone(),
            },
        );
        log::debug!("Cache entry refreshed for {}", fingerprint);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub async fn save(&self) -> Result<()> {
        let data = serde_json::to_string(&self.entries)?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }

    pub async fn load(path: impl AsRef<Path>, ttl: Duration) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(data) => serde_json::from_str(&data)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { entries, ttl, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cache() -> QueryCache {
        QueryCache::new("unused.json", Duration::hours(24))
    }

    #[test]
    fn unseen_fingerprint_is_stale() {
        let cache = cache();
        let fp = SearchParams::new("Data Scientist").fingerprint();
        assert!(!cache.is_fresh_enough(&fp, 5, 100, Utc::now()));
    }

    #[test]
    fn recent_refresh_with_enough_results_is_fresh() {
        let mut cache = cache();
        let params = SearchParams::new("Data Scientist");
        let fp = params.fingerprint();
        let now = Utc::now();

        cache.mark_refreshed(&fp, &params, now);
        assert!(cache.is_fresh_enough(&fp, 5, 20, now + Duration::hours(1)));
    }

    #[test]
    fn thin_results_force_refresh_even_when_fresh() {
        let mut cache = cache();
        let params = SearchParams::new("Data Scientist");
        let fp = params.fingerprint();
        let now = Utc::now();

        cache.mark_refreshed(&fp, &params, now);
        assert!(!cache.is_fresh_enough(&fp, 5, 3, now + Duration::minutes(5)));
    }

    #[test]
    fn expired_ttl_is_stale() {
        let mut cache = cache();
        let params = SearchParams::new("Data Scientist");
        let fp = params.fingerprint();
        let now = Utc::now();

        cache.mark_refreshed(&fp, &params, now);
        assert!(!cache.is_fresh_enough(&fp, 5, 20, now + Duration::hours(25)));
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = QueryCache::new(&path, Duration::hours(24));
        let params = SearchParams::new("SRE");
        let fp = params.fingerprint();
        cache.mark_refreshed(&fp, &params, Utc::now());
        cache.save().await.unwrap();

        let loaded = QueryCache::load(&path, Duration::hours(24)).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(&fp).unwrap().raw_params.query, "SRE");
    }
}
