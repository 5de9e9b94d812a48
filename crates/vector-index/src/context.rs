use crate::embeddings::Embedder;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Structured metadata extracted from a resume/bio, used to enrich the
/// scoring profile. Skills are stored as a native list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextProfile {
    #[serde(default)]
    pub skills: Vec<String>,
    pub experience_years: Option<u32>,
}

struct ContextEntry {
    embedding: Vec<f32>,
    profile: ContextProfile,
}

/// Stores resume/bio embeddings keyed by a content digest, so uploading the
/// same resume twice reuses the same context id.
pub struct ContextStore {
    entries: RwLock<HashMap<String, ContextEntry>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Embed a resume/bio and store it. Returns the context id.
    /// Only the head of very long documents is embedded; the key skills and
    /// experience sit at the top of a resume.
    pub async fn create_context_embedding(
        &self,
        embedder: &dyn Embedder,
        text: &str,
        profile: ContextProfile,
    ) -> Result<String> {
        let context_id = format!("{:x}", Sha256::digest(text.as_bytes()));
        let head: String = text.chars().take(4000).collect();
        let embedding = embedder.embed(&head).await?;

        self.entries.write().await.insert(
            context_id.clone(),
            ContextEntry { embedding, profile },
        );
        log::info!("Stored context embedding {}", context_id);
        Ok(context_id)
    }

    pub async fn get_embedding(&self, context_id: &str) -> Option<Vec<f32>> {
        self.entries
            .read()
            .await
            .get(context_id)
            .map(|e| e.embedding.clone())
    }

    pub async fn get_profile(&self, context_id: &str) -> Option<ContextProfile> {
        self.entries
            .read()
            .await
            .get(context_id)
            .map(|e| e.profile.clone())
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashEmbedder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn same_resume_yields_same_context_id() {
        let store = ContextStore::new();
        let embedder = HashEmbedder::default();

        let a = store
            .create_context_embedding(&embedder, "python sql spark", ContextProfile::default())
            .await
            .unwrap();
        let b = store
            .create_context_embedding(&embedder, "python sql spark", ContextProfile::default())
            .await
            .unwrap();
        assert_eq!(a, b);
        assert!(store.get_embedding(&a).await.is_some());
    }

    #[tokio::test]
    async fn profile_round_trips() {
        let store = ContextStore::new();
        let embedder = HashEmbedder::default();
        let profile = ContextProfile {
            skills: vec!["Python".to_string(), "Kafka".to_string()],
            experience_years: Some(6),
        };

        let id = store
            .create_context_embedding(&embedder, "resume text", profile)
            .await
            .unwrap();
        let loaded = store.get_profile(&id).await.unwrap();
        assert_eq!(loaded.skills.len(), 2);
        assert_eq!(loaded.experience_years, Some(6));
    }

    #[tokio::test]
    async fn unknown_context_is_none() {
        let store = ContextStore::new();
        assert!(store.get_embedding("nope").await.is_none());
        assert!(store.get_profile("nope").await.is_none());
    }
}
