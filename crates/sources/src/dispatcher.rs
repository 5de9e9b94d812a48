use crate::adapter::{market_of, SourceAdapter, SourceKind};
use crate::pool::ResourcePool;
use jobscout_protocol::NormalizedRecord;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Static routing policy: per-source timeout class and market inclusion,
/// evaluated before dispatch, never inside it.
#[derive(Debug, Clone)]
pub struct DispatchPolicy {
    pub api_timeout: Duration,
    pub automation_timeout: Duration,
    pub priority_timeout: Duration,
    /// Automation sources that historically return the most listings and
    /// deserve the longer leash.
    pub priority_sources: HashSet<String>,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            api_timeout: Duration::from_secs(10),
            automation_timeout: Duration::from_secs(25),
            priority_timeout: Duration::from_secs(45),
            priority_sources: ["Hirist", "Foundit", "Iimjobs", "Naukri", "Indeed"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl DispatchPolicy {
    fn timeout_for(&self, adapter: &dyn SourceAdapter) -> Duration {
        match adapter.kind() {
            SourceKind::Api => self.api_timeout,
            SourceKind::Automation => {
                if self.priority_sources.contains(adapter.name()) {
                    self.priority_timeout
                } else {
                    self.automation_timeout
                }
            }
        }
    }
}

/// Concurrent fan-out over every routed source with per-source timeout and
/// failure isolation.
///
/// Wall-clock time is bounded by the largest per-source timeout, never the
/// sum: one slow or hung source cannot delay or fail its siblings.
pub struct Dispatcher {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    pool: Arc<ResourcePool>,
    policy: DispatchPolicy,
}

impl Dispatcher {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, pool: Arc<ResourcePool>) -> Self {
        Self {
            adapters,
            pool,
            policy: DispatchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sources routed for a country, with their assigned timeouts.
    pub fn routes(&self, country: &str) -> Vec<(Arc<dyn SourceAdapter>, Duration)> {
        let market = market_of(country);
        self.adapters
            .iter()
            .filter(|adapter| adapter.markets().contains(&market))
            .map(|adapter| (Arc::clone(adapter), self.policy.timeout_for(adapter.as_ref())))
            .collect()
    }

    /// Run every routed source concurrently and return the flattened batch.
    /// The caller deduplicates before persisting.
    pub async fn dispatch(
        &self,
        query: &str,
        location: &str,
        page: u32,
        country: &str,
    ) -> Vec<NormalizedRecord> {
        let location = effective_location(location, country);
        let routes = self.routes(country);
        log::info!(
            "Dispatching '{}' in {} to {} sources",
            query,
            country,
            routes.len()
        );

        let mut tasks = JoinSet::new();
        for (adapter, per_timeout) in routes {
            let pool = Arc::clone(&self.pool);
            let query = query.to_string();
            let location = location.clone();
            let country = country.to_string();

            tasks.spawn(async move {
                run_source(adapter, pool, per_timeout, &query, &location, page, &country).await
            });
        }

        let mut batch = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(records) => batch.extend(records),
                Err(err) => log::error!("Source task panicked: {err}"),
            }
        }

        log::info!("Dispatch collected {} records", batch.len());
        batch
    }
}

/// Sources choke on an empty location; fall back to the market's hub city.
fn effective_location(location: &str, country: &str) -> String {
    if !location.trim().is_empty() {
        return location.to_string();
    }
    match market_of(country) {
        crate::adapter::Market::Gulf => "Dubai".to_string(),
        crate::adapter::Market::India => "India".to_string(),
    }
}

/// One source call under its timeout, with a pool session held for
/// automation sources. Every failure path yields an empty batch.
async fn run_source(
    adapter: Arc<dyn SourceAdapter>,
    pool: Arc<ResourcePool>,
    per_timeout: Duration,
    query: &str,
    location: &str,
    page: u32,
    country: &str,
) -> Vec<NormalizedRecord> {
    let name = adapter.name().to_string();
    let started = tokio::time::Instant::now();

    let call = async {
        // The session guard lives for the whole call; the timeout covers
        // the wait for a slot as well, so a saturated pool cannot stall
        // the request beyond the source's budget.
        let _session = match adapter.kind() {
            SourceKind::Automation => match pool.acquire().await {
                Ok(session) => Some(session),
                Err(err) => {
                    return Err(crate::adapter::SourceError::Unavailable(err.to_string()))
                }
            },
            SourceKind::Api => None,
        };
        adapter.search_jobs(query, location, page, country).await
    };

    match tokio::time::timeout(per_timeout, call).await {
        Ok(Ok(records)) => {
            log::info!(
                "{} finished in {:.1}s: {} jobs",
                name,
                started.elapsed().as_secs_f64(),
                records.len()
            );
            records
        }
        Ok(Err(err)) => {
            log::error!("{} failed: {}", name, err);
            Vec::new()
        }
        Err(_) => {
            log::warn!("{} timed out after {:?}", name, per_timeout);
            Vec::new()
        }
    }
}
