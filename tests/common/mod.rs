//! Utilità condivise per i test d'integrazione

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use linkease::error::{AppError, Result};
use linkease::models::ExecutionRecord;
use linkease::services::generation::{ImageGenerator, TextGenerator};
use linkease::services::publisher::Publisher;
use linkease::services::worker::WorkerContext;
use linkease::store::{JobStore, MemoryJobStore};

pub const PLACEHOLDER_URL: &str = "https://placehold.co/1200x628.png";

/// App di test con accesso diretto allo store per le verifiche
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryJobStore>,
}

pub fn build_app(
    text_generator: Arc<dyn TextGenerator>,
    image_generator: Arc<dyn ImageGenerator>,
    publish_webhook_url: &str,
) -> TestApp {
    let store = Arc::new(MemoryJobStore::new());
    let worker = WorkerContext::new(
        store.clone(),
        text_generator,
        image_generator,
        PLACEHOLDER_URL.to_string(),
        4,
    );
    let publisher = Arc::new(Publisher::new(publish_webhook_url.to_string()).unwrap());

    TestApp {
        router: linkease::routes::create_router(worker, publisher),
        store,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Attende che l'esecuzione raggiunga uno stato terminale
pub async fn wait_for_terminal(store: &MemoryJobStore, id: &Uuid) -> ExecutionRecord {
    for _ in 0..200 {
        if let Some(record) = store.get(id).await {
            if record.status.is_terminal() {
                return record;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("l'esecuzione {} non ha raggiunto uno stato terminale", id);
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}

// ---------------------------------------------------------------------------
// Capability AI di test
// ---------------------------------------------------------------------------

/// Risponde sempre con lo stesso contenuto
pub struct FixedTextGenerator(pub String);

#[async_trait]
impl TextGenerator for FixedTextGenerator {
    async fn generate_post(&self, _d: &str, _i: &str, _img: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Non termina mai: il job resta in `processing`
pub struct PendingTextGenerator;

#[async_trait]
impl TextGenerator for PendingTextGenerator {
    async fn generate_post(&self, _d: &str, _i: &str, _img: &str) -> Result<String> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        unreachable!("il generatore di test non deve terminare");
    }
}

/// Fallisce sempre con una causa dettagliata che non deve arrivare al client
pub struct FailingTextGenerator;

#[async_trait]
impl TextGenerator for FailingTextGenerator {
    async fn generate_post(&self, _d: &str, _i: &str, _img: &str) -> Result<String> {
        Err(AppError::GenerationError(
            "dettaglio interno: chiave API scaduta".to_string(),
        ))
    }
}

/// Esito fisso con contatore delle invocazioni
pub struct StaticImageGenerator {
    result: Option<String>,
    calls: AtomicUsize,
}

impl StaticImageGenerator {
    pub fn returning(result: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            result: result.map(|s| s.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for StaticImageGenerator {
    async fn generate_image(&self, _prompt: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}
