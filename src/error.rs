use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Campo obbligatorio mancante: {0}")]
    MissingField(String),

    #[error("Richiesta non valida: {0}")]
    BadRequest(String),

    #[error("Esecuzione non trovata: {0}")]
    JobNotFound(String),

    #[error("Errore di generazione: {0}")]
    GenerationError(String),

    #[error("Pubblicazione fallita: il webhook ha risposto con stato {0}")]
    PublishError(u16),

    #[error("Errore interno: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::MissingField(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::JobNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::GenerationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::PublishError(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
