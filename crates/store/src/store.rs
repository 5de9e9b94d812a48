use crate::error::Result;
use jobscout_protocol::JobRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle used across the read path and the background refresh.
/// Readers take the lock briefly per query; the refresh path writes through
/// its own guard and never holds the lock across network calls.
pub type SharedJobStore = Arc<RwLock<JobStore>>;

/// In-memory job store with JSON persistence.
///
/// Records are keyed by their deterministic identity, so re-upserting the
/// same listing from a later scrape overwrites in place.
pub struct JobStore {
    records: HashMap<String, JobRecord>,
    path: PathBuf,
}

impl JobStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            records: HashMap::new(),
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn into_shared(self) -> SharedJobStore {
        Arc::new(RwLock::new(self))
    }

    /// Upsert a batch of records. Idempotent: the same batch applied twice
    /// leaves the store unchanged.
    pub fn upsert_batch(&mut self, records: Vec<JobRecord>) -> usize {
        let count = records.len();
        for record in records {
            self.records.insert(record.id.clone(), record);
        }
        log::debug!("Upserted {} records. Total: {}", count, self.records.len());
        count
    }

    pub fn get(&self, id: &str) -> Option<&JobRecord> {
        self.records.get(id)
    }

    pub fn get_many(&self, ids: &[String]) -> Vec<JobRecord> {
        ids.iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sparse keyword candidates: a record matches when its title contains
    /// any query token longer than two characters, case-insensitive.
    /// Tokens OR together; full-phrase AND would starve the candidate set
    /// for multi-word queries.
    pub fn sparse_title_matches(&self, query: &str) -> Vec<JobRecord> {
        let tokens: Vec<String> = query
            .split_whitespace()
            .filter(|t| t.len() > 2)
            .map(|t| t.to_lowercase())
            .collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        self.records
            .values()
            .filter(|record| {
                let title = record.title.to_lowercase();
                tokens.iter().any(|token| title.contains(token.as_str()))
            })
            .cloned()
            .collect()
    }

    /// Save the store to its JSON file.
    pub async fn save(&self) -> Result<()> {
        let data = serde_json::to_string(&self.records)?;
        tokio::fs::write(&self.path, data).await?;
        log::info!("Saved {} records to {:?}", self.records.len(), self.path);
        Ok(())
    }

    /// Load a store from disk; a missing file yields an empty store.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match tokio::fs::read_to_string(&path).await {
            Ok(data) => serde_json::from_str(&data)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        log::info!("Loaded {} records from {:?}", records.len(), path);
        Ok(Self { records, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobscout_protocol::{job_identity, NormalizedRecord};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn job(title: &str, link: &str) -> JobRecord {
        JobRecord::from_normalized(
            NormalizedRecord {
                title: title.to_string(),
                company: "Acme".to_string(),
                apply_link: link.to_string(),
                source: "Naukri".to_string(),
                ..Default::default()
            },
            "India",
        )
    }

    #[test]
    fn upsert_is_idempotent() {
        let mut store = JobStore::new("unused.json");
        let batch = vec![job("Python Developer", "https://a/1"), job("SRE", "https://a/2")];
        store.upsert_batch(batch.clone());
        store.upsert_batch(batch);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn sparse_match_uses_or_semantics() {
        let mut store = JobStore::new("unused.json");
        store.upsert_batch(vec![
            job("Senior Python Developer", "https://a/1"),
            job("Data Scientist", "https://a/2"),
            job("QA Lead", "https://a/3"),
        ]);

        let hits = store.sparse_title_matches("Python Scientist");
        let mut titles: Vec<String> = hits.iter().map(|j| j.title.clone()).collect();
        titles.sort();
        assert_eq!(titles, vec!["Data Scientist", "Senior Python Developer"]);
    }

    #[test]
    fn sparse_match_skips_short_tokens() {
        let mut store = JobStore::new("unused.json");
        store.upsert_batch(vec![job("Go Developer", "https://a/1")]);

        // "Go" is too short to be a token; "in" likewise.
        assert!(store.sparse_title_matches("Go in").is_empty());
        assert_eq!(store.sparse_title_matches("Developer").len(), 1);
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.json");

        let mut store = JobStore::new(&path);
        store.upsert_batch(vec![job("Python Developer", "https://a/1")]);
        store.save().await.unwrap();

        let loaded = JobStore::load(&path).await.unwrap();
        assert_eq!(loaded.len(), 1);
        let id = job_identity("https://a/1", "Python Developer");
        assert_eq!(loaded.get(&id).unwrap().title, "Python Developer");
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JobStore::load(dir.path().join("absent.json")).await.unwrap();
        assert!(store.is_empty());
    }
}
