//! Trigger di generazione: accetta la richiesta e risponde subito con l'id

use axum::{extract::State, routing::post, Json, Router};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ErrorResponse, ExecutionRecord, GenerateRequest, GenerateResponse};
use crate::services::worker::{self, SharedWorkerContext};

#[derive(Clone)]
pub struct GenerateState {
    pub worker: SharedWorkerContext,
}

pub fn router(worker: SharedWorkerContext) -> Router {
    let state = GenerateState { worker };
    Router::new()
        .route("/api/generate", post(start_generation))
        .with_state(state)
}

/// Avvia la generazione asincrona di un post
#[utoipa::path(
    post,
    path = "/api/generate",
    tag = "Generazione",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Job creato, id per il polling", body = GenerateResponse),
        (status = 400, description = "Campo obbligatorio mancante", body = ErrorResponse),
    )
)]
pub async fn start_generation(
    State(state): State<GenerateState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    // Validazione prima di qualunque inserimento nello store
    request.validate()?;

    let execution_id = Uuid::new_v4();
    state
        .worker
        .store
        .insert(execution_id, ExecutionRecord::processing())
        .await;

    tracing::info!("Esecuzione {} creata, avvio worker", execution_id);

    // Fire-and-forget: la risposta non attende la generazione
    let worker_ctx = state.worker.clone();
    tokio::spawn(async move {
        worker::process_job(worker_ctx, execution_id, request).await;
    });

    Ok(Json(GenerateResponse {
        execution_id: execution_id.to_string(),
    }))
}
