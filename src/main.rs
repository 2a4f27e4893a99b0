use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use linkease::config::Config;
use linkease::middleware::rate_limit;
use linkease::models::{
    ErrorResponse, ExecutionRecord, GenerateRequest, GenerateResponse, GeneratedPost,
    HealthResponse, JobStatus, PublishRequest, PublishResponse,
};
use linkease::routes;
use linkease::services::generation::{HttpImageGenerator, HttpTextGenerator};
use linkease::services::publisher::Publisher;
use linkease::services::worker::WorkerContext;
use linkease::store::MemoryJobStore;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LinkEase API",
        version = "1.0.0",
        description = "API per la generazione e pubblicazione assistita da AI di post LinkedIn",
        license(name = "MIT"),
    ),
    paths(
        linkease::routes::generate::start_generation,
        linkease::routes::results::fetch_results,
        linkease::routes::publish::publish_post,
        linkease::routes::health::health_check,
    ),
    components(schemas(
        GenerateRequest,
        GenerateResponse,
        ExecutionRecord,
        GeneratedPost,
        JobStatus,
        PublishRequest,
        PublishResponse,
        HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Generazione", description = "Creazione job e polling risultati"),
        (name = "Pubblicazione", description = "Inoltro dei post approvati"),
        (name = "Sistema", description = "Health check e info"),
    ),
    servers(
        (url = "http://localhost:4000", description = "Server locale"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Carica variabili da .env
    dotenvy::dotenv().ok();

    // Inizializza logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkease=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Carica configurazione
    let config = Config::from_env();

    // Capability AI esterne
    let text_generator = match HttpTextGenerator::new(
        config.text_api_url.clone(),
        config.ai_api_key.clone(),
    ) {
        Ok(generator) => Arc::new(generator),
        Err(e) => {
            tracing::error!("Errore inizializzazione capability testo: {}", e);
            std::process::exit(1);
        }
    };

    let image_generator = match HttpImageGenerator::new(
        config.image_api_url.clone(),
        config.ai_api_key.clone(),
    ) {
        Ok(generator) => Arc::new(generator),
        Err(e) => {
            tracing::error!("Errore inizializzazione capability immagini: {}", e);
            std::process::exit(1);
        }
    };

    // Webhook di pubblicazione
    let publisher = match Publisher::new(config.publish_webhook_url.clone()) {
        Ok(publisher) => Arc::new(publisher),
        Err(e) => {
            tracing::error!("Errore inizializzazione publisher: {}", e);
            std::process::exit(1);
        }
    };

    // Job store in memoria e contesto worker
    let store = Arc::new(MemoryJobStore::new());
    let worker = WorkerContext::new(
        store,
        text_generator,
        image_generator,
        config.placeholder_image_url.clone(),
        config.max_concurrent_jobs,
    );

    // Crea rate limiter (100 richieste/minuto per default)
    let rate_limiter = rate_limit::create_rate_limiter(100);

    // CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes con middleware
    let api_routes = routes::create_router(worker.clone(), publisher).layer(middleware::from_fn(
        move |req, next| {
            let limiter = rate_limiter.clone();
            async move { rate_limit::rate_limit_middleware(limiter, req, next).await }
        },
    ));

    // Costruisci router completo con Swagger
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Avvia server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Indirizzo non valido");

    tracing::info!("========================================");
    tracing::info!("  LinkEase API v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("========================================");
    tracing::info!("Server: http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    tracing::info!("----------------------------------------");
    tracing::info!("Endpoints:");
    tracing::info!("  POST /api/generate       - Avvia generazione post");
    tracing::info!("  GET  /api/fetch-results  - Stato esecuzione (polling)");
    tracing::info!("  POST /api/publish        - Inoltra post approvato");
    tracing::info!("  GET  /api/health         - Health check");
    tracing::info!("----------------------------------------");
    tracing::info!("Webhook pubblicazione: {}", config.publish_webhook_url);
    tracing::info!("Job concorrenti max: {}", config.max_concurrent_jobs);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Allo shutdown annulla i worker in corso: scriveranno l'esito failed
    let worker_shutdown = worker.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Arresto in corso, annullo i job in background...");
            worker_shutdown.shutdown();
        })
        .await
        .unwrap();
}
