use axum::{
    Router,
    routing::{get, put},
};
use mongodb::Client;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod db;
pub mod error;
pub mod models;
pub mod routes;

/// Shared per-process state. The driver client carries its own connection
/// pool and is safe to clone into every handler; each handler builds a
/// fresh collection-scoped store from it.
#[derive(Clone)]
pub struct AppState {
    pub client: Client,
    pub db_name: String,
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Root and health
        .route("/", get(|| async { "Match Data API - v1.0" }))
        .route("/health", get(routes::health::health_check))
        // Match endpoints
        .route(
            "/matches",
            get(routes::matches::get_matches).post(routes::matches::create_match),
        )
        .route(
            "/matches/{id}",
            put(routes::matches::update_match).delete(routes::matches::delete_match),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
