//! # JobScout Vector Index
//!
//! Dense-retrieval collaborators behind trait seams: an [`Embedder`], a
//! [`VectorIndex`] keyed by job identity, a resume/bio [`ContextStore`],
//! and the cross-encoder [`Reranker`] contract. In-process implementations
//! ([`HashEmbedder`], [`InMemoryIndex`]) keep the pipeline runnable and
//! testable without external services; production deployments swap in
//! model-backed implementations behind the same traits.

mod context;
mod embeddings;
mod error;
mod index;
mod rerank;
mod rocchio;

pub use context::{ContextProfile, ContextStore};
pub use embeddings::{cosine_similarity, Embedder, HashEmbedder};
pub use error::{IndexError, Result};
pub use index::{index_text_for, InMemoryIndex, IndexFilter, IndexMetadata, VectorIndex};
pub use rerank::Reranker;
pub use rocchio::rocchio_blend;
