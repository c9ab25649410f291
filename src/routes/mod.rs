//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the REST surface and the websocket subscription endpoint into a
//! single Axum router. CORS is permissive: the service has no auth layer
//! and is meant to sit behind whatever fronts it.

pub mod todos;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/todos", get(todos::list).post(todos::create).delete(todos::clear_all))
        .route(
            "/api/todos/{id}",
            axum::routing::patch(todos::update_text).delete(todos::delete),
        )
        .route("/api/todos/{id}/toggle", post(todos::toggle))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
