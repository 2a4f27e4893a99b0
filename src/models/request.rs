use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, Result};

/// Richiesta di generazione di un post
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Descrizione o titolo del post
    #[serde(default)]
    pub description: String,
    /// Istruzioni per la generazione del contenuto
    #[serde(default)]
    pub instructions: String,
    /// Prompt o URL per l'immagine del post (opzionale)
    #[serde(default)]
    pub image: String,
}

impl GenerateRequest {
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(AppError::MissingField("description".to_string()));
        }
        if self.instructions.trim().is_empty() {
            return Err(AppError::MissingField("instructions".to_string()));
        }
        Ok(())
    }
}

/// Richiesta di pubblicazione di un post approvato
#[derive(Debug, Clone, Deserialize, serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[serde(default)]
    pub content_to_post: String,
    #[serde(default)]
    pub image_to_post_url: String,
    #[serde(default)]
    pub linkedin_auth_token: String,
}

impl PublishRequest {
    pub fn validate(&self) -> Result<()> {
        if self.content_to_post.trim().is_empty() {
            return Err(AppError::MissingField("contentToPost".to_string()));
        }
        if self.image_to_post_url.trim().is_empty() {
            return Err(AppError::MissingField("imageToPostUrl".to_string()));
        }
        if self.linkedin_auth_token.trim().is_empty() {
            return Err(AppError::MissingField("linkedinAuthToken".to_string()));
        }
        Ok(())
    }
}

/// Query per il recupero dei risultati
#[derive(Debug, Deserialize, ToSchema)]
pub struct FetchResultsQuery {
    #[serde(rename = "executionId")]
    pub execution_id: Option<String>,
}
