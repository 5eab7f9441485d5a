//! The mock remote service as a library, so `main.rs` and the integration
//! tests under `tests/` build the exact same router.

pub mod handlers;
pub mod models;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use handlers::*;
use tower_http::trace::TraceLayer;

pub fn app() -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/files", get(query_files).post(create_file))
        .route("/v1/files/:id", get(get_file).patch(update_file).delete(delete_file))
        .route("/v1/files/:id/reparent", post(reparent_file))
        .route("/v1/files/:id/content", get(download_content).put(upload_content))
        .layer(TraceLayer::new_for_http())
        .with_state(state::new_state())
}
