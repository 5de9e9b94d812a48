//! # JobScout Sources
//!
//! Everything between the orchestrator and the ~20 unreliable upstream
//! sources: the [`SourceAdapter`] contract, the [`ResourcePool`] bounding
//! concurrent automation sessions, and the [`Dispatcher`] that fans out to
//! every routed source with per-source timeout and failure isolation.

mod adapter;
mod dispatcher;
mod pool;

pub use adapter::{market_of, Market, SourceAdapter, SourceError, SourceKind};
pub use dispatcher::{DispatchPolicy, Dispatcher};
pub use pool::{PoolError, PoolSession, ResourcePool, SessionIdentity};
