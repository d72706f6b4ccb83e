use crate::backend::traits::ObjectStorage;
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

fn object_url(base_url: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), bucket, key)
}

/// Object bucket held in memory
pub struct MemoryStorage {
    bucket: String,
    base_url: String,
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new(bucket: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(key).cloned()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, key: &str, bytes: Vec<u8>, upsert: bool) -> Result<()> {
        let mut objects = self.objects.write().await;
        if !upsert && objects.contains_key(key) {
            return Err(MarketError::AlreadyExists(key.to_string()));
        }
        debug!("Stored {} bytes as {}/{}", bytes.len(), self.bucket, key);
        objects.insert(key.to_string(), bytes);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        object_url(&self.base_url, &self.bucket, key)
    }
}

/// Object bucket stored as files under `<root>/<bucket>/`
pub struct DirStorage {
    dir: PathBuf,
    bucket: String,
    base_url: String,
}

impl DirStorage {
    pub fn new(root: &Path, bucket: impl Into<String>, base_url: impl Into<String>) -> Self {
        let bucket = bucket.into();
        Self {
            dir: root.join(&bucket),
            bucket,
            base_url: base_url.into(),
        }
    }

    /// File an object is written to
    pub fn path_of(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait]
impl ObjectStorage for DirStorage {
    async fn upload(&self, key: &str, bytes: Vec<u8>, upsert: bool) -> Result<()> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(MarketError::Upload(format!("invalid object key '{}'", key)));
        }
        let path = self.path_of(key);
        if !upsert && tokio::fs::try_exists(&path).await? {
            return Err(MarketError::AlreadyExists(key.to_string()));
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, &bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        object_url(&self.base_url, &self.bucket, key)
    }
}
