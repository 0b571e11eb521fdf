use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::StoreError;

/// Keeps every key in one JSON object on disk.
///
/// Writes go to a sibling temp file that is then renamed over the original,
/// so a crash mid-write never leaves a half-written store behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = match self.read_all().await {
            Ok(entries) => entries,
            Err(StoreError::StorageCorruption(e)) => {
                warn!(path = %self.path.display(), error = %e, "store file is corrupted, overwriting");
                BTreeMap::new()
            }
            Err(e) => return Err(StoreError::Persistence(e.to_string())),
        };
        entries.insert(key.to_string(), value.to_string());

        let contents = serde_json::to_string_pretty(&entries)
            .map_err(|e| StoreError::Persistence(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Persistence(format!("can't create store directory: {}", e)))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)
            .await
            .map_err(|e| StoreError::Persistence(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Persistence(e.to_string()))?;

        debug!(path = %self.path.display(), key, "store written");
        Ok(())
    }
}
