use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

/// Contract with the platform's blob storage. `upload` must complete before
/// any record referencing the returned URL is persisted; callers abort the
/// whole operation when it fails, so a failed upload never leaves an orphan
/// group or message behind.
#[async_trait]
pub trait AttachmentStore {
    async fn upload(&self, data: Bytes) -> super::Result<String>;
}

pub struct InMemoryAttachmentStore {
    blobs: RwLock<HashMap<uuid::Uuid, Bytes>>,
}

impl InMemoryAttachmentStore {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

impl Default for InMemoryAttachmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttachmentStore for InMemoryAttachmentStore {
    async fn upload(&self, data: Bytes) -> super::Result<String> {
        if data.len() > super::MAX_BYTES {
            return Err(super::Error::TooLarge {
                size: data.len(),
                max: super::MAX_BYTES,
            });
        }

        let key = uuid::Uuid::new_v4();
        self.blobs.write().await.insert(key, data);

        Ok(format!("attachment://{key}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn uploads_yield_attachment_urls() {
        let store = InMemoryAttachmentStore::new();

        let url = store.upload(Bytes::from_static(b"jpeg-bytes")).await.unwrap();

        assert!(url.starts_with("attachment://"));
        assert!(!store.is_empty().await);
    }

    #[tokio::test]
    async fn oversized_blobs_are_rejected_by_the_store() {
        let store = InMemoryAttachmentStore::new();

        let result = store
            .upload(Bytes::from(vec![0u8; crate::attachment::MAX_BYTES + 1]))
            .await;

        assert!(matches!(
            result,
            Err(crate::attachment::Error::TooLarge { .. })
        ));
        assert!(store.is_empty().await);
    }
}
