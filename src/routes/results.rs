//! Recupero dello stato corrente di un'esecuzione

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{ErrorResponse, ExecutionRecord, FetchResultsQuery};
use crate::store::SharedJobStore;

#[derive(Clone)]
pub struct ResultsState {
    pub store: SharedJobStore,
}

pub fn router(store: SharedJobStore) -> Router {
    let state = ResultsState { store };
    Router::new()
        .route("/api/fetch-results", get(fetch_results))
        .with_state(state)
}

/// Restituisce il record di esecuzione così com'è: lettura pura, sicura da
/// ripetere in polling
#[utoipa::path(
    get,
    path = "/api/fetch-results",
    tag = "Generazione",
    params(
        ("executionId" = String, Query, description = "Identificativo dell'esecuzione")
    ),
    responses(
        (status = 200, description = "Record di esecuzione corrente", body = ExecutionRecord),
        (status = 400, description = "Parametro executionId mancante", body = ErrorResponse),
        (status = 404, description = "Esecuzione sconosciuta", body = ErrorResponse),
    )
)]
pub async fn fetch_results(
    State(state): State<ResultsState>,
    Query(query): Query<FetchResultsQuery>,
) -> Result<Json<ExecutionRecord>> {
    // Parametro assente o vuoto: richiesta non valida
    let id = match query.execution_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            return Err(AppError::BadRequest(
                "il parametro executionId è obbligatorio".to_string(),
            ))
        }
    };

    let execution_id = Uuid::parse_str(&id).map_err(|_| AppError::JobNotFound(id.clone()))?;

    let record = state
        .store
        .get(&execution_id)
        .await
        .ok_or_else(|| AppError::JobNotFound(id))?;

    Ok(Json(record))
}
