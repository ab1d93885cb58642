//! In-memory upload registry
//!
//! Session-scoped working state so the ask endpoint can reference a prior
//! upload by id. Nothing here touches disk; a restart clears it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::normalize::NormalizedContent;

#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size: usize,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    pub content: Arc<NormalizedContent>,
}

#[derive(Clone, Default)]
pub struct UploadRegistry {
    inner: Arc<RwLock<HashMap<Uuid, UploadRecord>>>,
}

impl UploadRegistry {
    pub async fn insert(&self, record: UploadRecord) {
        let mut guard = self.inner.write().await;
        guard.insert(record.id, record);
    }

    pub async fn get(&self, upload_id: &Uuid) -> Option<UploadRecord> {
        let guard = self.inner.read().await;
        guard.get(upload_id).cloned()
    }

    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }
}
