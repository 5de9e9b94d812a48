use async_trait::async_trait;
use jobscout_protocol::NormalizedRecord;
use thiserror::Error;

/// Per-source failure taxonomy. Every variant is isolated by the
/// dispatcher: logged, contributes an empty result, never raised to the
/// orchestrator.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Source timed out")]
    Timeout,

    #[error("No usable listings parsed: {0}")]
    ParseFailure(String),
}

/// How a source reaches its upstream, which decides its timeout class and
/// whether it needs a pool session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Plain HTTP search API: short timeout, no pool dependency.
    Api,
    /// Browser-automation scrape: longer timeout, holds a pool session for
    /// the duration of the call.
    Automation,
}

/// Job market a source serves. Routing excludes sources that do not serve
/// the requested country's market before dispatch ever starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    India,
    Gulf,
}

/// Map a request country onto its market.
pub fn market_of(country: &str) -> Market {
    match country.trim().to_lowercase().as_str() {
        "uae" | "ae" | "united arab emirates" => Market::Gulf,
        _ => Market::India,
    }
}

/// Uniform contract every upstream source exposes. The per-site DOM or wire
/// handling lives behind this trait and is not this crate's concern.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Markets this source serves. Defaults to India-only, matching most
    /// of the portfolio.
    fn markets(&self) -> &[Market] {
        &[Market::India]
    }

    async fn search_jobs(
        &self,
        query: &str,
        location: &str,
        page: u32,
        country: &str,
    ) -> Result<Vec<NormalizedRecord>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn country_maps_to_market() {
        assert_eq!(market_of("India"), Market::India);
        assert_eq!(market_of("UAE"), Market::Gulf);
        assert_eq!(market_of("ae"), Market::Gulf);
        assert_eq!(market_of("United Arab Emirates"), Market::Gulf);
        assert_eq!(market_of("anything else"), Market::India);
    }
}
