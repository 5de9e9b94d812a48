//! # JobScout Search
//!
//! The retrieval-and-ranking half of the pipeline: hybrid dense + sparse
//! candidate retrieval, hard structural filters, the deterministic
//! multi-factor relevance scorer, and the bounded cross-encoder rerank
//! blend with graceful fallback.

mod filters;
mod hybrid;
mod rerank;
mod scorer;

pub use filters::StructuralFilters;
pub use hybrid::{HybridRetriever, RetrievedSet};
pub use rerank::{blend_rerank, sigmoid};
pub use scorer::{QueryComplexity, RelevanceScorer, ScoredJob, UserProfile, WeightTable};
