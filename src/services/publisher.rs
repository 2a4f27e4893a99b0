//! Inoltro sincrono dei post approvati al webhook di pubblicazione
//!
//! Nessun retry e nessuna chiave di idempotenza: una doppia submission del
//! client produce una doppia pubblicazione a valle.

use crate::error::{AppError, Result};
use crate::models::{PublishRequest, PublishResponse};

pub struct Publisher {
    client: reqwest::Client,
    webhook_url: String,
}

impl Publisher {
    pub fn new(webhook_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Errore client webhook: {}", e)))?;

        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Inoltra il payload al webhook e attende l'esito
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishResponse> {
        request.validate()?;

        let response = self
            .client
            .post(&self.webhook_url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Errore invio al webhook di pubblicazione: {}", e);
                AppError::Internal("Webhook di pubblicazione non raggiungibile".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            // Il corpo upstream resta nei log, al client arriva solo lo stato
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "Il webhook di pubblicazione ha risposto {}: {}",
                status,
                body
            );
            return Err(AppError::PublishError(status.as_u16()));
        }

        tracing::info!("Post inoltrato al webhook di pubblicazione");

        Ok(PublishResponse {
            success: true,
            message: "Il post è stato inviato per la pubblicazione!".to_string(),
        })
    }
}
