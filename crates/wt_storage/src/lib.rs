use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use wt_core::{AppConfig, Error, Result, VectorStore};

pub mod backends;

pub use backends::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub collection: String,
    pub vector_size: u64,
}

impl BackendConfig {
    pub fn new(url: String, collection: String, vector_size: u64) -> Self {
        Self {
            url,
            collection,
            vector_size,
        }
    }

    pub fn from_app_config(config: &AppConfig, vector_size: u64) -> Self {
        Self::new(config.qdrant_url(), config.qdrant_collection.clone(), vector_size)
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Qdrant,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "qdrant" => Ok(Self::Qdrant),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}'. Available: memory, qdrant",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Qdrant => write!(f, "qdrant"),
        }
    }
}

pub async fn create_storage(kind: StorageKind, config: BackendConfig) -> Result<Arc<dyn VectorStore>> {
    match kind {
        StorageKind::Memory => Ok(Arc::new(MemoryStorage::new(config))),
        #[cfg(feature = "qdrant")]
        StorageKind::Qdrant => Ok(Arc::new(QdrantStorage::new(config).await?)),
        #[cfg(not(feature = "qdrant"))]
        StorageKind::Qdrant => Err(Error::Config(
            "Qdrant support was not compiled in; rebuild with the `qdrant` feature".to_string(),
        )),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, BackendConfig, StorageKind};
}
