//! # JobScout Service
//!
//! The orchestration layer tying the pipeline together: a request enters
//! [`Orchestrator::search`], gets an immediate answer from the indexed
//! store (hybrid retrieval, filters, scoring, rerank blend, final dedup).
//! When the cache says the data is stale or too thin, a supervised
//! background refresh fans out to every routed source, upserts the new
//! batch, and advances the cache timestamp, all off the request's critical
//! path.

mod config;
mod error;
mod feedback;
mod orchestrator;
mod refresh;

pub use config::ServiceConfig;
pub use error::{Result, ServiceError};
pub use feedback::{InteractionKind, InteractionLog};
pub use orchestrator::Orchestrator;
pub use refresh::{RefreshJob, RefreshWorker};
