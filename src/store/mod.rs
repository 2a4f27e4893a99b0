//! Job store per lo stato delle esecuzioni
//!
//! Lo store è una mappa condivisa chiave-valore con un solo scrittore per
//! chiave: il trigger di generazione inserisce il record, il worker scrive
//! l'unico aggiornamento terminale. L'interfaccia è un trait per poter
//! sostituire il backend in memoria con uno persistente.

mod memory;

pub use memory::MemoryJobStore;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{ExecutionRecord, GeneratedPost};

pub type SharedJobStore = Arc<dyn JobStore>;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Inserisce il record iniziale di un'esecuzione
    async fn insert(&self, id: Uuid, record: ExecutionRecord);

    /// Lettura pura del record corrente
    async fn get(&self, id: &Uuid) -> Option<ExecutionRecord>;

    /// Scrive l'esito terminale `completed`; no-op se il record è già terminale
    async fn complete(&self, id: &Uuid, data: GeneratedPost);

    /// Scrive l'esito terminale `failed`; no-op se il record è già terminale
    async fn fail(&self, id: &Uuid, error: String);
}
