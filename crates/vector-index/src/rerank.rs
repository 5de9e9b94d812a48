use crate::error::Result;
use async_trait::async_trait;

/// Cross-encoder collaborator: scores `(query, document)` pairs.
///
/// Raw scores are in an arbitrary, non-probabilistic range (typically
/// logits); the ranking layer sigmoid-normalizes them. Any error here must
/// degrade to rule-based ordering, never fail a request.
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn score(&self, query: &str, documents: &[String]) -> Result<Vec<f32>>;
}
