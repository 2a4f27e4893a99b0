use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// Identificativo dell'esecuzione da usare per il polling dei risultati
    #[serde(rename = "executionId")]
    pub execution_id: String,
}

#[derive(Debug, Serialize, serde::Deserialize, ToSchema)]
pub struct PublishResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Stato dell'API
    pub status: String,
    /// Versione dell'API
    pub version: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}
