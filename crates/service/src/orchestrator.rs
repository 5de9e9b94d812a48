use crate::config::ServiceConfig;
use crate::error::Result;
use crate::feedback::{InteractionKind, InteractionLog};
use crate::refresh::{RefreshJob, RefreshWorker};
use chrono::{Duration, Utc};
use jobscout_protocol::{dedup_records, parse_exp_range, SearchParams};
use jobscout_search::{
    blend_rerank, HybridRetriever, RelevanceScorer, ScoredJob, StructuralFilters, UserProfile,
};
use jobscout_store::{QueryCache, SharedJobStore};
use jobscout_sources::{Dispatcher, ResourcePool, SourceAdapter};
use jobscout_vector_index::{ContextProfile, ContextStore, Embedder, Reranker, VectorIndex};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

const SEMANTIC_BOOST: f64 = 10.0;

/// Owns the whole pipeline's lifecycle: pool, dispatcher, refresh workers,
/// and every collaborator the read path touches.
pub struct Orchestrator {
    config: ServiceConfig,
    store: SharedJobStore,
    cache: Arc<RwLock<QueryCache>>,
    index: Arc<dyn VectorIndex>,
    contexts: Arc<ContextStore>,
    interactions: Arc<InteractionLog>,
    reranker: Option<Arc<dyn Reranker>>,
    retriever: HybridRetriever,
    pool: Arc<ResourcePool>,
    refresh: RefreshWorker,
}

impl Orchestrator {
    pub fn new(
        config: ServiceConfig,
        store: SharedJobStore,
        cache: Arc<RwLock<QueryCache>>,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
        reranker: Option<Arc<dyn Reranker>>,
        adapters: Vec<Arc<dyn SourceAdapter>>,
    ) -> Result<Self> {
        let pool = Arc::new(ResourcePool::new(config.pool_capacity)?);
        let dispatcher = Arc::new(Dispatcher::new(adapters, Arc::clone(&pool)));
        let refresh = RefreshWorker::spawn(
            dispatcher,
            Arc::clone(&store),
            Arc::clone(&cache),
            Arc::clone(&index),
            Arc::clone(&embedder),
            config.refresh_queue,
            config.refresh_workers,
        );
        let retriever =
            HybridRetriever::new(Arc::clone(&index), embedder).with_top_k(config.dense_top_k);

        Ok(Self {
            config,
            store,
            cache,
            index,
            contexts: Arc::new(ContextStore::new()),
            interactions: Arc::new(InteractionLog::new()),
            reranker,
            retriever,
            pool,
            refresh,
        })
    }

    /// Primary entry point: answer from the indexed store now, refresh in
    /// the background when the cache is stale or the answer too thin.
    ///
    /// Returns the ranked records and whether a refresh was triggered.
    pub async fn search(&self, params: &SearchParams) -> (Vec<ScoredJob>, bool) {
        let now = Utc::now();
        let term = params.search_term();
        let fingerprint = params.fingerprint();
        let filters = StructuralFilters::from_params(params);

        let (context_embedding, feedback) = self.session_signals(params, now).await;

        let retrieved = {
            let store = self.store.read().await;
            self.retriever
                .retrieve(&store, &term, &filters, context_embedding, &feedback)
                .await
        };

        let refresh_triggered = !self
            .cache
            .read()
            .await
            .is_fresh_enough(
                &fingerprint,
                self.config.min_result_floor,
                retrieved.jobs.len(),
                now,
            );

        let profile = self.build_profile(params, &term).await;

        let mut scored: Vec<ScoredJob> = retrieved
            .jobs
            .into_iter()
            .map(|job| {
                let (mut score, mut breakdown) = RelevanceScorer::score_at(&job, &profile, now);
                if retrieved.vector_ids.contains(&job.id) {
                    score = (score + SEMANTIC_BOOST).min(100.0);
                    breakdown.set("semantic_boost", SEMANTIC_BOOST);
                }
                ScoredJob { job, score, breakdown }
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        if let Some(reranker) = &self.reranker {
            scored = blend_rerank(
                reranker.as_ref(),
                &term,
                scored,
                Some(self.config.rerank_top_n),
            )
            .await;
        }

        let ranked = dedup_scored(scored);

        if refresh_triggered {
            self.refresh.trigger(RefreshJob {
                params: params.clone(),
            });
        }

        log::info!(
            "Search '{}': {} results, refresh_triggered={}",
            term,
            ranked.len(),
            refresh_triggered
        );
        (ranked, refresh_triggered)
    }

    /// Embed and store a resume/bio; the returned context id keys later
    /// searches onto it.
    pub async fn create_context(&self, text: &str, profile: ContextProfile) -> Result<String> {
        let id = self
            .contexts
            .create_context_embedding(self.retriever_embedder(), text, profile)
            .await?;
        Ok(id)
    }

    /// Record a user interaction; positive ones feed the session boost.
    pub fn record_interaction(&self, context_id: &str, job_id: &str, kind: InteractionKind) {
        self.interactions.record(context_id, job_id, kind);
    }

    /// Stop accepting refreshes, drain the queue, and close the pool.
    pub async fn shutdown(self) {
        self.refresh.shutdown().await;
        self.pool.shutdown();
    }

    fn retriever_embedder(&self) -> &dyn Embedder {
        self.retriever.embedder()
    }

    /// Resume-context embedding plus recent positive-feedback vectors.
    async fn session_signals(
        &self,
        params: &SearchParams,
        now: chrono::DateTime<Utc>,
    ) -> (Option<Vec<f32>>, Vec<Vec<f32>>) {
        let Some(context_id) = &params.context_id else {
            return (None, Vec::new());
        };

        let context_embedding = self.contexts.get_embedding(context_id).await;

        let ids = self.interactions.recent_positive(
            context_id,
            Duration::minutes(self.config.feedback_window_minutes),
            self.config.feedback_limit,
            now,
        );
        if ids.is_empty() {
            return (context_embedding, Vec::new());
        }

        let feedback = match self.index.get_embeddings(&ids).await {
            Ok(vectors) => vectors.into_iter().flatten().collect(),
            Err(err) => {
                log::warn!("Fetching feedback embeddings failed: {err}");
                Vec::new()
            }
        };
        (context_embedding, feedback)
    }

    /// Base profile from the search inputs, enriched with resume-context
    /// metadata: resume skills merge in, and resume experience applies when
    /// the user did not filter by experience themselves.
    async fn build_profile(&self, params: &SearchParams, term: &str) -> UserProfile {
        let mut experience_years = params
            .experience
            .iter()
            .filter_map(|raw| parse_exp_range(raw))
            .map(|range| range.min)
            .next()
            .unwrap_or(0);
        let mut skills = params.skills.clone();

        if let Some(context_id) = &params.context_id {
            if let Some(context) = self.contexts.get_profile(context_id).await {
                merge_skills(&mut skills, &context.skills);
                if params.experience.is_empty() {
                    if let Some(years) = context.experience_years {
                        experience_years = years;
                    }
                }
                log::debug!(
                    "Profile enriched from context {}: {} skills",
                    context_id,
                    skills.len()
                );
            }
        }

        UserProfile {
            query: term.to_string(),
            skills,
            experience_years,
        }
    }
}

fn merge_skills(into: &mut Vec<String>, from: &[String]) {
    let mut seen: HashSet<String> = into.iter().map(|s| s.to_lowercase()).collect();
    for skill in from {
        if seen.insert(skill.to_lowercase()) {
            into.push(skill.clone());
        }
    }
}

/// Final dedup over the assembled response: storage can still hold
/// duplicates written before identity hashing was in place.
fn dedup_scored(scored: Vec<ScoredJob>) -> Vec<ScoredJob> {
    let kept: HashSet<String> = dedup_records(scored.iter().map(|s| s.job.clone()).collect())
        .into_iter()
        .map(|job| job.id)
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    scored
        .into_iter()
        .filter(|s| kept.contains(&s.job.id) && seen.insert(s.job.id.clone()))
        .collect()
}
