pub mod client_addr;
pub mod update;

use axum::{Extension, Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::SharedState;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/nic/update", get(update::update_get).post(update::update_post))
        .route("/healthz", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

async fn health() -> &'static str {
    "ok"
}
