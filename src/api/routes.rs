use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/anytime-td-adjusted", get(handlers::anytime_td_adjusted))
        .route("/refresh", post(handlers::refresh))
        .route("/roster-stats", get(handlers::roster_stats))
        .with_state(state)
        .layer(cors)
}
