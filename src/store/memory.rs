use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{ExecutionRecord, GeneratedPost};

use super::JobStore;

/// Store in memoria: i record vivono per la durata del processo, nessuna
/// eviction. Le transizioni terminali sono definitive.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<Uuid, ExecutionRecord>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Numero di esecuzioni registrate
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, id: Uuid, record: ExecutionRecord) {
        self.jobs.write().await.insert(id, record);
    }

    async fn get(&self, id: &Uuid) -> Option<ExecutionRecord> {
        self.jobs.read().await.get(id).cloned()
    }

    async fn complete(&self, id: &Uuid, data: GeneratedPost) {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(id) {
            Some(record) if record.status.is_terminal() => {
                tracing::warn!(
                    "Esecuzione {} già in stato terminale {}, completamento ignorato",
                    id,
                    record.status
                );
            }
            Some(record) => record.mark_completed(data),
            None => {
                tracing::warn!("Completamento per esecuzione sconosciuta {}", id);
            }
        }
    }

    async fn fail(&self, id: &Uuid, error: String) {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(id) {
            Some(record) if record.status.is_terminal() => {
                tracing::warn!(
                    "Esecuzione {} già in stato terminale {}, fallimento ignorato",
                    id,
                    record.status
                );
            }
            Some(record) => record.mark_failed(error),
            None => {
                tracing::warn!("Fallimento per esecuzione sconosciuta {}", id);
            }
        }
    }
}
