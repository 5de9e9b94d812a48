use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// All parameters of one search request. This is the unit the cache keys on.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub ctc: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub portals: Vec<String>,
    pub context_id: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_page() -> u32 {
    1
}

fn default_country() -> String {
    "India".to_string()
}

impl SearchParams {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            page: 1,
            country: default_country(),
            ..Default::default()
        }
    }

    /// Effective search term: the trimmed query, or a generic fallback so an
    /// empty query still searches something.
    pub fn search_term(&self) -> String {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            "Job".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Canonical fingerprint over all parameters: list-valued parameters are
    /// lowercased and sorted so call-site ordering never splits the cache.
    pub fn fingerprint(&self) -> QueryFingerprint {
        fn canonical_list(values: &[String]) -> String {
            let mut items: Vec<String> =
                values.iter().map(|v| v.trim().to_lowercase()).collect();
            items.sort();
            items.join(",")
        }

        let canonical = format!(
            "q={};page={};locs={};exp={};ctc={};skills={};portals={};ctx={};country={}",
            self.search_term().to_lowercase(),
            self.page,
            canonical_list(&self.locations),
            canonical_list(&self.experience),
            canonical_list(&self.ctc),
            canonical_list(&self.skills),
            canonical_list(&self.portals),
            self.context_id.as_deref().unwrap_or(""),
            self.country.trim().to_lowercase(),
        );

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        QueryFingerprint(format!("{:x}", hasher.finalize()))
    }
}

/// Canonical hash of a normalized search-parameter set, used as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryFingerprint(pub String);

impl std::fmt::Display for QueryFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fingerprint_ignores_list_order_and_case() {
        let mut a = SearchParams::new("Data Scientist");
        a.skills = vec!["Python".to_string(), "SQL".to_string()];
        a.locations = vec!["Bangalore".to_string(), "Pune".to_string()];

        let mut b = SearchParams::new("data scientist");
        b.skills = vec!["sql".to_string(), "python".to_string()];
        b.locations = vec!["pune".to_string(), "bangalore".to_string()];

        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_is_sensitive_to_parameters() {
        let a = SearchParams::new("Data Scientist");
        let mut b = SearchParams::new("Data Scientist");
        b.page = 2;
        assert_ne!(a.fingerprint(), b.fingerprint());

        let mut c = SearchParams::new("Data Scientist");
        c.context_id = Some("abc".to_string());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn empty_query_falls_back_to_generic_term() {
        let params = SearchParams::new("   ");
        assert_eq!(params.search_term(), "Job");
    }
}
