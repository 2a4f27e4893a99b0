//! Approvazione e inoltro del post al webhook di pubblicazione

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use crate::error::Result;
use crate::models::{ErrorResponse, PublishRequest, PublishResponse};
use crate::services::publisher::Publisher;

#[derive(Clone)]
pub struct PublishState {
    pub publisher: Arc<Publisher>,
}

pub fn router(publisher: Arc<Publisher>) -> Router {
    let state = PublishState { publisher };
    Router::new()
        .route("/api/publish", post(publish_post))
        .with_state(state)
}

/// Inoltra sincronamente il contenuto approvato al webhook esterno
#[utoipa::path(
    post,
    path = "/api/publish",
    tag = "Pubblicazione",
    request_body = PublishRequest,
    responses(
        (status = 200, description = "Post inviato per la pubblicazione", body = PublishResponse),
        (status = 400, description = "Campo obbligatorio mancante", body = ErrorResponse),
        (status = 500, description = "Il webhook ha risposto con errore", body = ErrorResponse),
    )
)]
pub async fn publish_post(
    State(state): State<PublishState>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<PublishResponse>> {
    let response = state.publisher.publish(&request).await?;
    Ok(Json(response))
}
