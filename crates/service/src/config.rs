use serde::{Deserialize, Serialize};

/// Tunables for the whole pipeline. Defaults mirror the production
/// constants; deployments override via a JSON snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Cache staleness threshold, in hours.
    pub cache_ttl_hours: i64,
    /// A fresh cache still refreshes when the current result set is
    /// thinner than this.
    pub min_result_floor: usize,
    /// Dense nearest-neighbor candidates fetched per query.
    pub dense_top_k: usize,
    /// Slice of already-scored candidates that goes through the
    /// cross-encoder.
    pub rerank_top_n: usize,
    /// Ceiling on simultaneously open automation sessions.
    pub pool_capacity: usize,
    /// Pending background refreshes before triggers are dropped.
    pub refresh_queue: usize,
    /// Concurrent background refresh workers.
    pub refresh_workers: usize,
    /// How far back positive interactions count as feedback, in minutes.
    pub feedback_window_minutes: i64,
    /// Most recent positive interactions used for the Rocchio blend.
    pub feedback_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl_hours: 24,
            min_result_floor: 5,
            dense_top_k: 50,
            rerank_top_n: 50,
            pool_capacity: 8,
            refresh_queue: 32,
            refresh_workers: 2,
            feedback_window_minutes: 60,
            feedback_limit: 10,
        }
    }
}

impl ServiceConfig {
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_production_constants() {
        let config = ServiceConfig::default();
        assert_eq!(config.cache_ttl_hours, 24);
        assert_eq!(config.min_result_floor, 5);
        assert_eq!(config.dense_top_k, 50);
        assert_eq!(config.rerank_top_n, 50);
        assert_eq!(config.pool_capacity, 8);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = ServiceConfig::from_json(r#"{"pool_capacity": 4}"#).unwrap();
        assert_eq!(config.pool_capacity, 4);
        assert_eq!(config.cache_ttl_hours, 24);
    }
}
