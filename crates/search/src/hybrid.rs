use crate::filters::StructuralFilters;
use jobscout_protocol::JobRecord;
use jobscout_store::JobStore;
use jobscout_vector_index::{rocchio_blend, Embedder, IndexFilter, VectorIndex};
use std::collections::HashSet;
use std::sync::Arc;

const DEFAULT_TOP_K: usize = 50;
const ROCCHIO_ALPHA: f32 = 0.8;
const ROCCHIO_BETA: f32 = 0.2;

/// Candidates surviving retrieval and structural filtering, plus the set of
/// ids that came in through the dense leg (used for the semantic boost).
#[derive(Debug, Default)]
pub struct RetrievedSet {
    pub jobs: Vec<JobRecord>,
    pub vector_ids: HashSet<String>,
}

/// Hybrid candidate retrieval: dense top-K neighbors unioned with sparse
/// keyword matches, then hard structural filters.
///
/// The dense leg degrades gracefully: if embedding or the index fails, the
/// request proceeds on sparse candidates alone.
pub struct HybridRetriever {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl HybridRetriever {
    pub fn new(index: Arc<dyn VectorIndex>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            index,
            embedder,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Retrieve candidates for one request.
    ///
    /// The query vector is the supplied context embedding when present
    /// (Rocchio-adapted toward recent positive feedback), otherwise the
    /// embedded query text.
    pub async fn retrieve(
        &self,
        store: &JobStore,
        query: &str,
        filters: &StructuralFilters,
        context_embedding: Option<Vec<f32>>,
        feedback: &[Vec<f32>],
    ) -> RetrievedSet {
        let vector_ids = self
            .dense_candidates(query, filters, context_embedding, feedback)
            .await;

        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates: Vec<JobRecord> = Vec::new();

        let dense_ids: Vec<String> = vector_ids.iter().cloned().collect();
        for job in store.get_many(&dense_ids) {
            if seen.insert(job.id.clone()) {
                candidates.push(job);
            }
        }
        for job in store.sparse_title_matches(query) {
            if seen.insert(job.id.clone()) {
                candidates.push(job);
            }
        }

        let total = candidates.len();
        let jobs: Vec<JobRecord> = candidates.into_iter().filter(|j| filters.admits(j)).collect();
        log::debug!(
            "Hybrid retrieval: {} candidates, {} after filters ({} dense hits)",
            total,
            jobs.len(),
            vector_ids.len()
        );

        RetrievedSet { jobs, vector_ids }
    }

    async fn dense_candidates(
        &self,
        query: &str,
        filters: &StructuralFilters,
        context_embedding: Option<Vec<f32>>,
        feedback: &[Vec<f32>],
    ) -> HashSet<String> {
        let query_vector = match context_embedding {
            Some(base) => {
                if feedback.is_empty() {
                    base
                } else {
                    log::debug!("Applying Rocchio blend over {} feedback vectors", feedback.len());
                    rocchio_blend(&base, feedback, ROCCHIO_ALPHA, ROCCHIO_BETA)
                }
            }
            None => match self.embedder.embed(query).await {
                Ok(vector) => vector,
                Err(err) => {
                    log::warn!("Query embedding failed, falling back to sparse only: {err}");
                    return HashSet::new();
                }
            },
        };

        // Pre-filter by country at the index so foreign-market entries do
        // not occupy top-K slots they can never survive.
        let index_filter = filters.country().map(|country| IndexFilter {
            country: Some(country.to_string()),
            source: None,
        });

        match self
            .index
            .query(&query_vector, self.top_k, index_filter.as_ref())
            .await
        {
            Ok(hits) => hits.into_iter().map(|(id, _)| id).collect(),
            Err(err) => {
                log::warn!("Vector search failed, falling back to sparse only: {err}");
                HashSet::new()
            }
        }
    }
}
