//! # JobScout Protocol
//!
//! Shared domain types for the job aggregation pipeline: the canonical
//! [`JobRecord`], the raw [`NormalizedRecord`] shape produced by source
//! adapters, deterministic record identity, query fingerprinting, filter
//! range parsing, and the two-stage deduplication discipline.

mod dedup;
mod fingerprint;
mod identity;
mod ranges;
mod types;

pub use dedup::dedup_records;
pub use fingerprint::{QueryFingerprint, SearchParams};
pub use identity::job_identity;
pub use ranges::{parse_ctc_range, parse_exp_range, CtcRange, ExpRange};
pub use types::{JobRecord, NormalizedRecord, ScoreBreakdown};
