use crate::embeddings::cosine_similarity;
use crate::error::{IndexError, Result};
use async_trait::async_trait;
use jobscout_protocol::JobRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Filterable metadata stored alongside each dense entry, upserted in
/// lockstep with the owning [`JobRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub title: String,
    pub company: String,
    pub location: String,
    pub source: String,
    pub country: String,
    pub experience_min: u32,
    pub ctc_min: Option<f64>,
}

impl IndexMetadata {
    pub fn from_job(job: &JobRecord) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            source: job.source.clone(),
            country: job.country.clone(),
            experience_min: job.experience_min,
            ctc_min: job.ctc_min,
        }
    }
}

/// Optional metadata pre-filter evaluated before similarity ranking.
#[derive(Debug, Clone, Default)]
pub struct IndexFilter {
    pub country: Option<String>,
    pub source: Option<String>,
}

impl IndexFilter {
    fn admits(&self, metadata: &IndexMetadata) -> bool {
        if let Some(country) = &self.country {
            if !metadata.country.eq_ignore_ascii_case(country) {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if !metadata.source.eq_ignore_ascii_case(source) {
                return false;
            }
        }
        true
    }
}

/// Dense index collaborator. Keys are job identities.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, id: &str, embedding: Vec<f32>, metadata: IndexMetadata) -> Result<()>;

    /// Up to `top_k` `(id, similarity)` pairs, best match first. Scores are
    /// cosine similarities (higher is closer), never distances; an
    /// implementation backed by a distance metric must convert before
    /// returning or the sort order inverts.
    async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
        filter: Option<&IndexFilter>,
    ) -> Result<Vec<(String, f32)>>;

    async fn get_embeddings(&self, ids: &[String]) -> Result<Vec<Option<Vec<f32>>>>;
}

/// Rich text representation embedded per job: title and company carry the
/// most signal, the description tail is capped.
pub fn index_text_for(job: &JobRecord) -> String {
    let desc: String = job.description.chars().take(500).collect();
    format!(
        "{} at {}. Skills: {}. Location: {}. {}",
        job.title,
        job.company,
        job.skills.join(", "),
        job.location,
        desc
    )
}

#[derive(Serialize, Deserialize)]
struct IndexEntry {
    embedding: Vec<f32>,
    metadata: IndexMetadata,
}

/// Brute-force cosine index with JSON persistence.
pub struct InMemoryIndex {
    dimension: usize,
    entries: RwLock<HashMap<String, IndexEntry>>,
    path: PathBuf,
}

impl InMemoryIndex {
    pub fn new(path: impl AsRef<Path>, dimension: usize) -> Self {
        Self {
            dimension,
            entries: RwLock::new(HashMap::new()),
            path: path.as_ref().to_path_buf(),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn save(&self) -> Result<()> {
        let entries = self.entries.read().await;
        let data = serde_json::to_string(&*entries)?;
        tokio::fs::write(&self.path, data).await?;
        log::info!("Saved {} index entries to {:?}", entries.len(), self.path);
        Ok(())
    }

    pub async fn load(path: impl AsRef<Path>, dimension: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries: HashMap<String, IndexEntry> = match tokio::fs::read_to_string(&path).await {
            Ok(data) => serde_json::from_str(&data)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        log::info!("Loaded {} index entries from {:?}", entries.len(), path);
        Ok(Self {
            dimension,
            entries: RwLock::new(entries),
            path,
        })
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(IndexError::InvalidDimension {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn upsert(&self, id: &str, embedding: Vec<f32>, metadata: IndexMetadata) -> Result<()> {
        self.check_dimension(&embedding)?;
        self.entries
            .write()
            .await
            .insert(id.to_string(), IndexEntry { embedding, metadata });
        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
        filter: Option<&IndexFilter>,
    ) -> Result<Vec<(String, f32)>> {
        self.check_dimension(embedding)?;

        let entries = self.entries.read().await;
        let mut scores: Vec<(String, f32)> = entries
            .iter()
            .filter(|(_, entry)| filter.map_or(true, |f| f.admits(&entry.metadata)))
            .map(|(id, entry)| (id.clone(), cosine_similarity(embedding, &entry.embedding)))
            .collect();

        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scores.truncate(top_k);
        Ok(scores)
    }

    async fn get_embeddings(&self, ids: &[String]) -> Result<Vec<Option<Vec<f32>>>> {
        let entries = self.entries.read().await;
        Ok(ids
            .iter()
            .map(|id| entries.get(id).map(|e| e.embedding.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn metadata(source: &str, country: &str) -> IndexMetadata {
        IndexMetadata {
            title: "Python Developer".to_string(),
            company: "Acme".to_string(),
            location: "Bangalore".to_string(),
            source: source.to_string(),
            country: country.to_string(),
            experience_min: 2,
            ctc_min: None,
        }
    }

    #[tokio::test]
    async fn query_returns_nearest_first() {
        let index = InMemoryIndex::new("unused.json", 3);
        index.upsert("a", vec![1.0, 0.0, 0.0], metadata("Naukri", "India")).await.unwrap();
        index.upsert("b", vec![0.9, 0.1, 0.0], metadata("Naukri", "India")).await.unwrap();
        index.upsert("c", vec![0.0, 1.0, 0.0], metadata("Naukri", "India")).await.unwrap();

        let hits = index.query(&[1.0, 0.0, 0.0], 2, None).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, "a");
        assert_eq!(hits[1].0, "b");
    }

    #[tokio::test]
    async fn dimension_mismatch_is_rejected() {
        let index = InMemoryIndex::new("unused.json", 3);
        let err = index
            .upsert("a", vec![1.0, 0.0], metadata("Naukri", "India"))
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::InvalidDimension { .. }));

        assert!(index.query(&[1.0], 5, None).await.is_err());
    }

    #[tokio::test]
    async fn metadata_filter_is_applied_before_ranking() {
        let index = InMemoryIndex::new("unused.json", 2);
        index.upsert("in", vec![1.0, 0.0], metadata("Naukri", "India")).await.unwrap();
        index.upsert("ae", vec![1.0, 0.0], metadata("Bayt", "UAE")).await.unwrap();

        let filter = IndexFilter {
            country: Some("India".to_string()),
            source: None,
        };
        let hits = index.query(&[1.0, 0.0], 10, Some(&filter)).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "in");
    }

    #[tokio::test]
    async fn get_embeddings_preserves_order_with_gaps() {
        let index = InMemoryIndex::new("unused.json", 2);
        index.upsert("a", vec![1.0, 0.0], metadata("Naukri", "India")).await.unwrap();

        let out = index
            .get_embeddings(&["missing".to_string(), "a".to_string()])
            .await
            .unwrap();
        assert_eq!(out[0], None);
        assert_eq!(out[1], Some(vec![1.0, 0.0]));
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");

        let index = InMemoryIndex::new(&path, 2);
        index.upsert("a", vec![0.5, 0.5], metadata("Naukri", "India")).await.unwrap();
        index.save().await.unwrap();

        let loaded = InMemoryIndex::load(&path, 2).await.unwrap();
        assert_eq!(loaded.len().await, 1);
    }
}
