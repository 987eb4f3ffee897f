use std::sync::Arc;
use tracing::{debug, info};
use wt_core::tokens::count_tokens;
use wt_core::{ArticleRecord, ChunkPoint, EmbeddingModel, Error, Result, SearchMatch, TokenCounter, VectorStore};

pub mod chunker;

pub use chunker::{split_document, Chunk, ChunkingConfig};

pub const DEFAULT_TOP_K: usize = 5;

/// Chunks, embeds and stores articles, and answers similarity queries over them.
pub struct Indexer {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingModel>,
    tokens: Arc<TokenCounter>,
    chunking: ChunkingConfig,
    indexed: bool,
}

impl Indexer {
    /// An indexer that has not seen any document yet.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingModel>,
        tokens: Arc<TokenCounter>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            tokens,
            chunking,
            indexed: false,
        }
    }

    /// Reuse whatever the collection already holds.
    pub async fn open(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingModel>,
        tokens: Arc<TokenCounter>,
        chunking: ChunkingConfig,
    ) -> Result<Self> {
        info!("📂 Loading existing index from collection {}", store.collection());
        let mut indexer = Self::new(store, embedder, tokens, chunking);
        indexer.indexed = indexer.store.count().await? > 0;
        Ok(indexer)
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// Name of the embedding model, used as the pricing key.
    pub fn embedding_model(&self) -> &str {
        self.embedder.name()
    }

    /// Index one article. Returns the number of chunks written.
    pub async fn index(&mut self, document: &ArticleRecord) -> Result<usize> {
        info!("📥 Adding '{}' to index", document.title);
        let chunks = split_document(document, self.chunking);
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

        let embeddings = self
            .embedder
            .generate_batch(&texts)
            .await
            .map_err(|e| e.in_stage("Error in content indexing"))?;
        if embeddings.len() != chunks.len() {
            return Err(Error::backend(
                "Error in content indexing",
                format!("{} chunks but {} embeddings", chunks.len(), embeddings.len()),
            ));
        }

        let points: Vec<ChunkPoint> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| ChunkPoint {
                text: chunk.text,
                title: document.title.clone(),
                url: document.url.clone(),
                chunk_title: chunk.title,
                ordinal: chunk.ordinal,
                embedding,
            })
            .collect();
        self.store.upsert(&points).await?;

        self.tokens.add_embedding_tokens(count_tokens(&document.content));
        self.indexed = true;
        debug!("Indexed {} chunks of {}", points.len(), document.url);
        Ok(points.len())
    }

    pub async fn index_all(&mut self, documents: &[ArticleRecord]) -> Result<usize> {
        info!("📚 Creating index from {} documents", documents.len());
        let mut total = 0;
        for document in documents {
            total += self.index(document).await?;
        }
        Ok(total)
    }

    /// Up to `top_k` chunks most similar to `query`, best first.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchMatch>> {
        if !self.indexed {
            return Err(Error::NotIndexed);
        }
        let embedding = self
            .embedder
            .generate_embeddings(query)
            .await
            .map_err(|e| e.in_stage("Error in index search"))?;
        self.tokens.add_embedding_tokens(count_tokens(query));
        self.store.search(&embedding, top_k).await
    }

    pub async fn clear(&mut self) -> Result<()> {
        info!("🧹 Clearing index");
        self.store.reset().await?;
        self.indexed = false;
        Ok(())
    }
}
