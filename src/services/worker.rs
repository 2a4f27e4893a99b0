//! Worker in background per i job di generazione
//!
//! Ogni richiesta accettata avvia un worker fire-and-forget: il chiamante non
//! attende l'esito, che viene comunicato solo attraverso il job store. La
//! concorrenza effettiva è limitata da un semaforo e l'intero pool è
//! annullabile via `CancellationToken` allo shutdown.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{GenerateRequest, GeneratedPost};
use crate::services::generation::{resolve_image_reference, ImageGenerator, TextGenerator};
use crate::store::SharedJobStore;

/// Messaggio generico registrato nel record: la causa reale resta nei log
pub const GENERATION_FAILED_MESSAGE: &str = "La generazione del contenuto AI è fallita.";

pub type SharedWorkerContext = Arc<WorkerContext>;

/// Dipendenze condivise dai worker di generazione
pub struct WorkerContext {
    pub store: SharedJobStore,
    text_generator: Arc<dyn TextGenerator>,
    image_generator: Arc<dyn ImageGenerator>,
    placeholder_image_url: String,
    semaphore: Arc<Semaphore>,
    cancel_token: CancellationToken,
}

impl WorkerContext {
    pub fn new(
        store: SharedJobStore,
        text_generator: Arc<dyn TextGenerator>,
        image_generator: Arc<dyn ImageGenerator>,
        placeholder_image_url: String,
        max_concurrent_jobs: usize,
    ) -> SharedWorkerContext {
        Arc::new(Self {
            store,
            text_generator,
            image_generator,
            placeholder_image_url,
            semaphore: Arc::new(Semaphore::new(max_concurrent_jobs)),
            cancel_token: CancellationToken::new(),
        })
    }

    /// Annulla tutti i worker in corso e quelli in attesa del semaforo
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

/// Elabora un job fino al suo unico esito terminale
///
/// Non restituisce errori al chiamante: qualunque fallimento viene catturato
/// e convertito nel record `failed`.
pub async fn process_job(ctx: SharedWorkerContext, execution_id: Uuid, request: GenerateRequest) {
    let _permit = match ctx.semaphore.acquire().await {
        Ok(permit) => permit,
        Err(_) => return,
    };

    let outcome = tokio::select! {
        biased;
        _ = ctx.cancel_token.cancelled() => {
            Err(AppError::Internal("elaborazione interrotta per shutdown".to_string()))
        }
        result = run_generation(&ctx, &request) => result,
    };

    match outcome {
        Ok(post) => {
            tracing::info!("Generazione completata per l'esecuzione {}", execution_id);
            ctx.store.complete(&execution_id, post).await;
        }
        Err(e) => {
            // La causa non viene esposta al client
            tracing::error!("Generazione fallita per l'esecuzione {}: {}", execution_id, e);
            ctx.store
                .fail(&execution_id, GENERATION_FAILED_MESSAGE.to_string())
                .await;
        }
    }
}

async fn run_generation(ctx: &WorkerContext, request: &GenerateRequest) -> Result<GeneratedPost> {
    let image_url = resolve_image_reference(
        &request.image,
        ctx.image_generator.as_ref(),
        &ctx.placeholder_image_url,
    )
    .await?;

    let post_content = ctx
        .text_generator
        .generate_post(&request.description, &request.instructions, &image_url)
        .await?;

    Ok(GeneratedPost {
        post_content,
        image_url,
    })
}
