use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

pub mod flights;
pub mod health;
pub mod refresh;
pub mod settings;
pub mod summary;

pub fn router(state: AppState) -> Router {
    // Very permissive CORS for local dev (tighten for prod)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // health
        .route("/health", get(health::health))
        // flights
        .route("/api/flights", get(flights::list_flights))
        .route("/api/refresh_data", post(refresh::refresh_data))
        // financials
        .route("/api/summary", get(summary::get_summary))
        .route(
            "/api/financial-settings",
            get(settings::get_settings).put(settings::put_settings),
        )
        // state & middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
