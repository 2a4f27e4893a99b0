//! Capability esterne di generazione testo e immagini
//!
//! Le capability sono collaboratori esterni raggiunti via HTTP con contratti
//! JSON minimi: testo `{description, instructions, image}` → `{postContent}`,
//! immagine `{prompt}` → `{imageUrl}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Capability di generazione del contenuto testuale di un post
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_post(
        &self,
        description: &str,
        instructions: &str,
        image_url: &str,
    ) -> Result<String>;
}

/// Capability di generazione immagini da prompt
///
/// `Ok(None)` indica che la capability non ha prodotto alcuna immagine,
/// non un errore.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>>;
}

#[derive(Debug, Serialize)]
struct TextGenerationPayload<'a> {
    description: &'a str,
    instructions: &'a str,
    image: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextGenerationResponse {
    post_content: String,
}

#[derive(Debug, Serialize)]
struct ImageGenerationPayload<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationResponse {
    #[serde(default)]
    image_url: Option<String>,
}

fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()
        .map_err(|e| AppError::Internal(format!("Errore client HTTP: {}", e)))
}

pub struct HttpTextGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTextGenerator {
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate_post(
        &self,
        description: &str,
        instructions: &str,
        image_url: &str,
    ) -> Result<String> {
        let payload = TextGenerationPayload {
            description,
            instructions,
            image: image_url,
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            AppError::GenerationError(format!("Capability testo non raggiungibile: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::GenerationError(format!(
                "La capability testo ha risposto con stato {}",
                response.status()
            )));
        }

        let body: TextGenerationResponse = response.json().await.map_err(|e| {
            AppError::GenerationError(format!("Risposta della capability testo malformata: {}", e))
        })?;

        Ok(body.post_content)
    }
}

pub struct HttpImageGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpImageGenerator {
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>> {
        let payload = ImageGenerationPayload { prompt };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            AppError::GenerationError(format!("Capability immagini non raggiungibile: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::GenerationError(format!(
                "La capability immagini ha risposto con stato {}",
                response.status()
            )));
        }

        let body: ImageGenerationResponse = response.json().await.map_err(|e| {
            AppError::GenerationError(format!(
                "Risposta della capability immagini malformata: {}",
                e
            ))
        })?;

        Ok(body.image_url)
    }
}

/// Un riferimento immagine è un URL assoluto se inizia con uno schema HTTP
pub fn is_absolute_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Risolve il riferimento immagine effettivo per un post
///
/// URL assoluto → usato così com'è; campo vuoto → placeholder; altrimenti il
/// valore è un prompt per la capability immagini, con fallback al placeholder
/// se la generazione non produce alcun URL.
pub async fn resolve_image_reference(
    image: &str,
    generator: &dyn ImageGenerator,
    placeholder_url: &str,
) -> Result<String> {
    let trimmed = image.trim();

    if trimmed.is_empty() {
        return Ok(placeholder_url.to_string());
    }

    if is_absolute_url(trimmed) {
        return Ok(trimmed.to_string());
    }

    match generator.generate_image(trimmed).await? {
        Some(url) => Ok(url),
        None => Ok(placeholder_url.to_string()),
    }
}
