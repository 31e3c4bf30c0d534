use crate::errors::AppError;
use crate::models::{ClientDraft, ClientRecord};
use chrono::Utc;
use std::future::Future;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Persistence for client records.
///
/// Implementations assign identity and creation time on `create` and return
/// records from `list_all` newest first.
pub trait ClientStore: Send + Sync + 'static {
    fn create(
        &self,
        draft: ClientDraft,
    ) -> impl Future<Output = Result<ClientRecord, AppError>> + Send;

    fn list_all(&self) -> impl Future<Output = Result<Vec<ClientRecord>, AppError>> + Send;

    fn find(&self, id: Uuid) -> impl Future<Output = Result<Option<ClientRecord>, AppError>> + Send;
}

/// Process-local store, used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct InMemoryClientStore {
    // Kept in creation order.
    records: RwLock<Vec<ClientRecord>>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl ClientStore for InMemoryClientStore {
    async fn create(&self, draft: ClientDraft) -> Result<ClientRecord, AppError> {
        let mut records = self.records.write().await;

        // Timestamp is taken under the lock so creation order and time agree.
        let record = ClientRecord {
            id: Uuid::new_v4(),
            input: draft.input,
            score: draft.score.score,
            score_source: draft.score.source,
            offer: draft.offer,
            created_at: Utc::now(),
        };
        records.push(record.clone());

        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<ClientRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().rev().cloned().collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<ClientRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }
}
