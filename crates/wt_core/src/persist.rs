//! Best-effort file persistence.
//!
//! Writes and reads here never return `Err`. A failure is logged and handed
//! back as [`Persisted::Failed`], and the caller decides whether it matters.

use std::fs;
use std::path::{Path, PathBuf};
use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::{Error, Result};

#[must_use]
#[derive(Debug)]
pub enum Persisted<T> {
    Done(T),
    Failed(Error),
}

impl<T> Persisted<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Done(value) => Ok(value),
            Self::Failed(e) => Err(e),
        }
    }
}

impl<T: Default> Persisted<T> {
    pub fn unwrap_or_default(self) -> T {
        self.ok().unwrap_or_default()
    }
}

impl<T> From<Result<T>> for Persisted<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Done(value),
            Err(e) => Self::Failed(e),
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<PathBuf> {
    ensure_parent(path)?;
    fs::write(path, contents)?;
    Ok(path.to_path_buf())
}

/// Serialize `value` as pretty UTF-8 JSON at `path`, creating parent directories.
pub fn save_json<S: Serialize>(value: &S, path: &Path) -> Persisted<PathBuf> {
    let result = serde_json::to_string_pretty(value)
        .map_err(Error::from)
        .and_then(|json| write_file(path, &json));
    if let Err(e) = &result {
        tracing::error!("Error saving content to {}: {}", path.display(), e);
    } else {
        tracing::info!("Content saved to {}", path.display());
    }
    result.into()
}

pub fn load_json<D: DeserializeOwned>(path: &Path) -> Persisted<D> {
    let result = fs::read_to_string(path)
        .map_err(Error::from)
        .and_then(|json| serde_json::from_str(&json).map_err(Error::from));
    if let Err(e) = &result {
        tracing::error!("Error loading content from {}: {}", path.display(), e);
    }
    result.into()
}

pub fn save_text(text: &str, path: &Path) -> Persisted<PathBuf> {
    let result = write_file(path, text);
    if let Err(e) = &result {
        tracing::error!("Error saving {}: {}", path.display(), e);
    }
    result.into()
}
