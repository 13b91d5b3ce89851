//! In-memory storage provider for tests and ephemeral deployments.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::storage::{ByteStream, StorageObjectMeta, StorageProvider};

/// Payload bytes plus the write timestamp.
#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    modified: DateTime<Utc>,
}

/// In-memory storage provider backed by a `BTreeMap`.
///
/// Keys stay sorted, so `list` output is deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageProvider {
    objects: Arc<RwLock<BTreeMap<String, StoredObject>>>,
}

impl MemoryStorageProvider {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let data = self.read_bytes(path).await?;
        let stream = futures::stream::once(async move { Ok(data) });
        Ok(Box::pin(stream))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let objects = self.objects.read().await;
        objects
            .get(path)
            .map(|o| o.data.clone())
            .ok_or_else(|| AppError::not_found(format!("Payload not found: {path}")))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        objects.insert(
            path.to_string(),
            StoredObject {
                data,
                modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        objects.remove(path);
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.objects.read().await.contains_key(path))
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<StorageObjectMeta>> {
        let objects = self.objects.read().await;
        Ok(objects
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(path, obj)| StorageObjectMeta {
                path: path.clone(),
                size_bytes: obj.data.len() as u64,
                last_modified: Some(obj.modified),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_roundtrip() {
        let provider = MemoryStorageProvider::new();
        provider
            .write("documents/u1/a.pdf", Bytes::from("payload"))
            .await
            .unwrap();
        let data = provider.read_bytes("documents/u1/a.pdf").await.unwrap();
        assert_eq!(data, Bytes::from("payload"));
    }

    #[tokio::test]
    async fn test_missing_read_is_not_found() {
        let provider = MemoryStorageProvider::new();
        let err = provider.read_bytes("nope").await.unwrap_err();
        assert_eq!(err.kind, docvault_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_filters_by_prefix() {
        let provider = MemoryStorageProvider::new();
        provider
            .write("documents/u1/a.pdf", Bytes::from("a"))
            .await
            .unwrap();
        provider
            .write("documents/u2/b.pdf", Bytes::from("b"))
            .await
            .unwrap();
        provider
            .write("other/c.pdf", Bytes::from("c"))
            .await
            .unwrap();

        let entries = provider.list("documents/").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "documents/u1/a.pdf");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let provider = MemoryStorageProvider::new();
        provider.write("x", Bytes::from("1")).await.unwrap();
        provider.delete("x").await.unwrap();
        provider.delete("x").await.unwrap();
        assert!(!provider.exists("x").await.unwrap());
    }
}
