//! Polling lato client dei risultati di generazione
//!
//! Replica la macchina a stati del client web come sottoscrizione periodica
//! annullabile: ogni `start` crea un timer a intervallo fisso che interroga
//! la sorgente dei risultati finché non osserva uno stato terminale. Il
//! riavvio è idempotente (la sottoscrizione precedente viene annullata) e il
//! drop del poller ferma il timer. Nessun limite massimo di durata.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{ExecutionRecord, GeneratedPost, JobStatus};

/// Intervallo fisso tra i fetch, come il client web originale
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Sorgente dei record di esecuzione interrogata dal poller
#[async_trait]
pub trait ResultSource: Send + Sync {
    async fn fetch(&self, execution_id: &Uuid) -> Result<ExecutionRecord>;
}

/// Sorgente HTTP che interroga l'endpoint `/api/fetch-results`
pub struct HttpResultSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpResultSource {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Errore client HTTP: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ResultSource for HttpResultSource {
    async fn fetch(&self, execution_id: &Uuid) -> Result<ExecutionRecord> {
        let url = format!(
            "{}/api/fetch-results?executionId={}",
            self.base_url, execution_id
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Errore fetch risultati: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::JobNotFound(execution_id.to_string()));
        }

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Il fetch dei risultati ha risposto con stato {}",
                response.status()
            )));
        }

        response
            .json::<ExecutionRecord>()
            .await
            .map_err(|e| AppError::Internal(format!("Record di esecuzione malformato: {}", e)))
    }
}

/// Stati del flusso lato client, dalla submission alla pubblicazione
#[derive(Debug, Clone, PartialEq)]
pub enum PollerState {
    Idle,
    Generating,
    Polling,
    Completed(GeneratedPost),
    Publishing,
    Published,
    Error(String),
}

/// Sottoscrizione periodica ai risultati di un'esecuzione
pub struct ResultPoller {
    source: Arc<dyn ResultSource>,
    interval: Duration,
    state_tx: Arc<watch::Sender<PollerState>>,
    active: Option<CancellationToken>,
}

impl ResultPoller {
    pub fn new(source: Arc<dyn ResultSource>, interval: Duration) -> Self {
        let (state_tx, _) = watch::channel(PollerState::Idle);
        Self {
            source,
            interval,
            state_tx: Arc::new(state_tx),
            active: None,
        }
    }

    /// Receiver per osservare le transizioni di stato
    pub fn subscribe(&self) -> watch::Receiver<PollerState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> PollerState {
        self.state_tx.borrow().clone()
    }

    /// La submission è partita: nessun polling attivo finché non c'è un id
    pub fn mark_generating(&mut self) {
        self.stop();
        self.state_tx.send_replace(PollerState::Generating);
    }

    /// Avvia il polling per un'esecuzione; un eventuale polling precedente
    /// viene fermato prima di partire
    pub fn start(&mut self, execution_id: Uuid) {
        self.stop();

        let token = CancellationToken::new();
        self.active = Some(token.clone());
        self.state_tx.send_replace(PollerState::Polling);

        let source = self.source.clone();
        let state_tx = self.state_tx.clone();
        let interval = self.interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Il primo tick di `interval` è immediato: va consumato perché il
            // primo fetch avvenga dopo un intervallo pieno, come setInterval
            ticker.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return,
                    _ = ticker.tick() => {}
                }

                match source.fetch(&execution_id).await {
                    Ok(record) => match record.status {
                        // Nessuna azione: si attende il prossimo tick
                        JobStatus::Processing => {}
                        JobStatus::Completed => {
                            let next = match record.data {
                                Some(post) => PollerState::Completed(post),
                                None => PollerState::Error(
                                    "Risultato assente nel record completato".to_string(),
                                ),
                            };
                            state_tx.send_replace(next);
                            return;
                        }
                        JobStatus::Failed => {
                            let message = record.error.unwrap_or_else(|| {
                                "Generazione del contenuto fallita.".to_string()
                            });
                            state_tx.send_replace(PollerState::Error(message));
                            return;
                        }
                    },
                    Err(e) => {
                        // Errore di trasporto: nessun retry automatico
                        tracing::error!("Polling fallito per l'esecuzione {}: {}", execution_id, e);
                        state_tx.send_replace(PollerState::Error(
                            "Impossibile recuperare i risultati.".to_string(),
                        ));
                        return;
                    }
                }
            }
        });
    }

    /// Ferma la sottoscrizione corrente, se presente
    pub fn stop(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }

    /// La pubblicazione del contenuto approvato è in corso
    pub fn begin_publishing(&mut self) {
        self.state_tx.send_replace(PollerState::Publishing);
    }

    pub fn mark_published(&mut self) {
        self.state_tx.send_replace(PollerState::Published);
    }

    /// Torna allo stato iniziale per una nuova submission
    pub fn reset(&mut self) {
        self.stop();
        self.state_tx.send_replace(PollerState::Idle);
    }
}

impl Drop for ResultPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
