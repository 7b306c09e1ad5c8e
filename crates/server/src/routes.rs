use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    // The browser client is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/api/rules",
            get(handlers::list_rules).post(handlers::create_rule),
        )
        .route("/api/reapply-rules", post(handlers::reapply_rules))
        .route("/api/generate-dsl", post(handlers::generate_dsl))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
