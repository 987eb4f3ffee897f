use async_trait::async_trait;
use crate::types::ArticleRecord;
use crate::Result;

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Name shown in progress output
    fn name(&self) -> &str;

    /// Fetch the page whose title is exactly `topic`
    async fn fetch(&self, topic: &str) -> Result<ArticleRecord>;
}
