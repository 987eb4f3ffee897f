use async_trait::async_trait;
use crate::types::{ChunkPoint, SearchMatch};
use crate::Result;

#[async_trait]
pub trait VectorStore: Send + Sync {
    fn collection(&self) -> &str;

    /// Write chunks into the collection
    async fn upsert(&self, points: &[ChunkPoint]) -> Result<()>;

    /// Nearest neighbours of `embedding`, best first
    async fn search(&self, embedding: &[f32], limit: usize) -> Result<Vec<SearchMatch>>;

    /// Number of points in the collection
    async fn count(&self) -> Result<usize>;

    /// Drop the collection and create it again, empty
    async fn reset(&self) -> Result<()>;
}
