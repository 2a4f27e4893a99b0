#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Endpoint della capability di generazione testo
    pub text_api_url: String,
    /// Endpoint della capability di generazione immagini
    pub image_api_url: String,
    /// API key per le capability AI (header Authorization: Bearer)
    pub ai_api_key: Option<String>,
    /// Webhook esterno a cui inoltrare i post approvati
    pub publish_webhook_url: String,
    /// Immagine di ripiego quando non viene fornito né risolto alcun riferimento
    pub placeholder_image_url: String,
    /// Numero massimo di job di generazione concorrenti
    pub max_concurrent_jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            text_api_url: "https://ai.larc.ai/v1/generate-post".to_string(),
            image_api_url: "https://ai.larc.ai/v1/generate-image".to_string(),
            ai_api_key: None,
            publish_webhook_url:
                "https://n8n.larc.ai/webhook/76d3b8d7-4c24-46c8-a578-86e571d0acd6".to_string(),
            placeholder_image_url: "https://placehold.co/1200x628.png".to_string(),
            max_concurrent_jobs: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("LINKEASE_HOST") {
            config.host = host;
        }

        if let Ok(port) = std::env::var("LINKEASE_PORT") {
            if let Ok(p) = port.parse() {
                config.port = p;
            }
        }

        if let Ok(url) = std::env::var("LINKEASE_TEXT_API_URL") {
            config.text_api_url = url;
        }

        if let Ok(url) = std::env::var("LINKEASE_IMAGE_API_URL") {
            config.image_api_url = url;
        }

        if let Ok(key) = std::env::var("LINKEASE_AI_API_KEY") {
            config.ai_api_key = Some(key);
        }

        if let Ok(url) = std::env::var("LINKEASE_PUBLISH_WEBHOOK_URL") {
            config.publish_webhook_url = url;
        }

        if let Ok(url) = std::env::var("LINKEASE_PLACEHOLDER_IMAGE_URL") {
            config.placeholder_image_url = url;
        }

        if let Ok(max) = std::env::var("LINKEASE_MAX_CONCURRENT_JOBS") {
            if let Ok(m) = max.parse() {
                config.max_concurrent_jobs = m;
            }
        }

        config
    }
}
