pub mod generate;
pub mod health;
pub mod publish;
pub mod results;

use std::sync::Arc;

use axum::Router;

use crate::services::publisher::Publisher;
use crate::services::worker::SharedWorkerContext;

pub fn create_router(worker: SharedWorkerContext, publisher: Arc<Publisher>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(generate::router(worker.clone()))
        .merge(results::router(worker.store.clone()))
        .merge(publish::router(publisher))
}
