use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No Wikipedia page found for '{0}'.")]
    NotFound(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{stage}: {message}")]
    Backend { stage: String, message: String },

    #[error("Index not created. Please add documents first.")]
    NotIndexed,

    #[error("No pricing entry for model '{0}'")]
    UnknownModel(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

/// Coarse grouping used when a failure reaches the top of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    PermissionDenied,
    Network,
    Backend,
    Other,
}

impl Error {
    pub fn backend(stage: impl Into<String>, message: impl ToString) -> Self {
        Self::Backend {
            stage: stage.into(),
            message: message.to_string(),
        }
    }

    /// Re-wraps a failure from a model call with the stage that issued it.
    /// Transport errors keep their own category.
    pub fn in_stage(self, stage: &str) -> Self {
        match self {
            Self::Network(e) if e.is_decode() => Self::backend(stage, malformed(&e)),
            Self::Network(e) => Self::Network(e),
            Self::Backend { message, .. } => Self::backend(stage, message),
            other => Self::backend(stage, other),
        }
    }

    /// Sorts a failed HTTP exchange. A body that does not decode is the
    /// backend's fault; anything else is transport.
    pub fn from_http(backend: &str, e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::backend(backend, malformed(&e))
        } else {
            Self::Network(e)
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::PermissionDenied(_) => ErrorCategory::PermissionDenied,
            Self::Network(_) => ErrorCategory::Network,
            Self::Backend { .. } => ErrorCategory::Backend,
            _ => ErrorCategory::Other,
        }
    }
}

fn malformed(e: &reqwest::Error) -> String {
    format!("malformed response: {}", e)
}

pub type Result<T> = std::result::Result<T, Error>;
