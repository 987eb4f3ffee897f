use async_trait::async_trait;
use std::sync::Arc;
use qdrant_client::{
    qdrant::{
        CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, ScoredPoint,
        SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
    },
    Payload, Qdrant,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use wt_core::{ChunkPoint, Error, Result, SearchMatch, VectorStore};
use crate::BackendConfig;

pub struct QdrantStorage {
    client: Arc<Qdrant>,
    config: BackendConfig,
}

impl QdrantStorage {
    pub async fn new(config: BackendConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.url)
            .build()
            .map_err(|e| Error::External(e.into()))?;
        let storage = Self {
            client: Arc::new(client),
            config,
        };
        storage.ensure_collection().await?;
        Ok(storage)
    }

    async fn ensure_collection(&self) -> Result<()> {
        let exists = self
            .client
            .collection_exists(&self.config.collection)
            .await
            .map_err(|e| Error::External(e.into()))?;

        if !exists {
            info!("🗂️ Creating collection {}", self.config.collection);
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.config.collection)
                        .vectors_config(VectorParamsBuilder::new(self.config.vector_size, Distance::Cosine)),
                )
                .await
                .map_err(|e| Error::External(e.into()))?;
        }
        Ok(())
    }

    fn to_point(point: &ChunkPoint) -> Result<PointStruct> {
        // Stable ids so re-indexing a page overwrites its chunks.
        let id = Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("{}#{}", point.url, point.ordinal).as_bytes());
        let payload: Payload = json!({
            "text": point.text,
            "title": point.title,
            "url": point.url,
            "chunk_title": point.chunk_title,
            "ordinal": point.ordinal,
        })
        .try_into()
        .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(PointStruct::new(id.to_string(), point.embedding.clone(), payload))
    }

    fn to_match(point: ScoredPoint) -> SearchMatch {
        let text = |key: &str| {
            point
                .payload
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_default()
        };
        SearchMatch {
            score: point.score,
            text: text("text"),
            title: text("title"),
            url: text("url"),
            chunk_title: text("chunk_title"),
            ordinal: point
                .payload
                .get("ordinal")
                .and_then(|v| v.as_integer())
                .unwrap_or_default() as usize,
        }
    }
}

#[async_trait]
impl VectorStore for QdrantStorage {
    fn collection(&self) -> &str {
        &self.config.collection
    }

    async fn upsert(&self, points: &[ChunkPoint]) -> Result<()> {
        let points = points.iter().map(Self::to_point).collect::<Result<Vec<_>>>()?;
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.config.collection, points).wait(true))
            .await
            .map_err(|e| Error::External(e.into()))?;
        Ok(())
    }

    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<SearchMatch>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.config.collection, embedding.to_vec(), limit as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| Error::External(e.into()))?;

        Ok(response.result.into_iter().map(Self::to_match).collect())
    }

    async fn count(&self) -> Result<usize> {
        let response = self
            .client
            .count(CountPointsBuilder::new(&self.config.collection).exact(true))
            .await
            .map_err(|e| Error::External(e.into()))?;
        Ok(response.result.map(|r| r.count as usize).unwrap_or_default())
    }

    async fn reset(&self) -> Result<()> {
        self.client
            .delete_collection(&self.config.collection)
            .await
            .map_err(|e| Error::External(e.into()))?;
        self.ensure_collection().await
    }
}
