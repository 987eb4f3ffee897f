use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use wt_core::{cosine_similarity, ChunkPoint, Error, Result, SearchMatch, VectorStore};
use crate::BackendConfig;

pub struct MemoryStore {
    points: Vec<ChunkPoint>,
    vector_size: u64,
}

impl MemoryStore {
    pub fn new(vector_size: u64) -> Self {
        Self {
            points: Vec::new(),
            vector_size,
        }
    }

    fn check_dimensions(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() as u64 != self.vector_size {
            return Err(Error::Storage(format!(
                "Expected {}-dimensional vector, got {}",
                self.vector_size,
                embedding.len()
            )));
        }
        Ok(())
    }

    pub fn upsert(&mut self, points: &[ChunkPoint]) -> Result<()> {
        for point in points {
            self.check_dimensions(&point.embedding)?;
            match self
                .points
                .iter_mut()
                .find(|p| p.url == point.url && p.ordinal == point.ordinal)
            {
                Some(existing) => *existing = point.clone(),
                None => self.points.push(point.clone()),
            }
        }
        Ok(())
    }

    pub fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<SearchMatch>> {
        self.check_dimensions(embedding)?;
        let mut matches: Vec<SearchMatch> = self
            .points
            .iter()
            .map(|p| SearchMatch {
                score: cosine_similarity(embedding, &p.embedding),
                text: p.text.clone(),
                title: p.title.clone(),
                url: p.url.clone(),
                chunk_title: p.chunk_title.clone(),
                ordinal: p.ordinal,
            })
            .collect();
        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        matches.truncate(limit);
        Ok(matches)
    }
}

/// Vector collection held in process memory; gone when the process exits.
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
    config: BackendConfig,
}

impl MemoryStorage {
    pub fn new(config: BackendConfig) -> Self {
        let store = Arc::new(RwLock::new(MemoryStore::new(config.vector_size)));
        Self { store, config }
    }
}

#[async_trait]
impl VectorStore for MemoryStorage {
    fn collection(&self) -> &str {
        &self.config.collection
    }

    async fn upsert(&self, points: &[ChunkPoint]) -> Result<()> {
        let mut store = self.store.write().await;
        store.upsert(points)?;
        debug!("{} now holds {} points", self.config.collection, store.points.len());
        Ok(())
    }

    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<SearchMatch>> {
        let store = self.store.read().await;
        store.search(embedding, limit)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.store.read().await.points.len())
    }

    async fn reset(&self) -> Result<()> {
        let mut store = self.store.write().await;
        *store = MemoryStore::new(self.config.vector_size);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(url: &str, ordinal: usize, embedding: Vec<f32>) -> ChunkPoint {
        ChunkPoint {
            text: format!("chunk {} of {}", ordinal, url),
            title: "Test Article".to_string(),
            url: url.to_string(),
            chunk_title: "Test Article".to_string(),
            ordinal,
            embedding,
        }
    }

    fn storage() -> MemoryStorage {
        MemoryStorage::new(BackendConfig::new("memory://".into(), "articles".into(), 3))
    }

    #[tokio::test]
    async fn test_memory_storage_ranks_by_similarity() {
        let storage = storage();
        storage
            .upsert(&[
                point("http://a", 0, vec![1.0, 0.0, 0.0]),
                point("http://a", 1, vec![0.7, 0.7, 0.0]),
                point("http://b", 0, vec![0.0, 0.0, 1.0]),
            ])
            .await
            .unwrap();

        let matches = storage.search(&[1.0, 0.1, 0.0], 2).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].url.as_str(), matches[0].ordinal), ("http://a", 0));
        assert_eq!((matches[1].url.as_str(), matches[1].ordinal), ("http://a", 1));
        assert!(matches[0].score >= matches[1].score);
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_chunk() {
        let storage = storage();
        storage.upsert(&[point("http://a", 0, vec![1.0, 0.0, 0.0])]).await.unwrap();
        storage.upsert(&[point("http://a", 0, vec![0.0, 1.0, 0.0])]).await.unwrap();
        assert_eq!(storage.count().await.unwrap(), 1);

        let matches = storage.search(&[0.0, 1.0, 0.0], 5).await.unwrap();
        assert!((matches[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_reset_and_dimension_check() {
        let storage = storage();
        assert!(storage.upsert(&[point("http://a", 0, vec![1.0])]).await.is_err());
        storage.upsert(&[point("http://a", 0, vec![1.0, 0.0, 0.0])]).await.unwrap();
        storage.reset().await.unwrap();
        assert_eq!(storage.count().await.unwrap(), 0);
        assert!(storage.search(&[1.0, 0.0, 0.0], 3).await.unwrap().is_empty());
    }
}
