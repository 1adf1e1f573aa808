use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{analyze, health};
use crate::state::AppState;

/// Build the router. Unmatched paths fall through to axum's 404 handler;
/// the CORS layer answers OPTIONS preflights for any origin.
pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(health::router())
        .merge(analyze::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
