/**
 * Router Configuration
 *
 * # Routes
 *
 * - `GET /` - health check, returns a fixed greeting
 * - `GET /socket` - WebSocket upgrade into the realtime hub
 *
 * # Middleware
 *
 * - CORS: any origin and headers, methods GET/POST/PUT/DELETE
 * - Request logging through `TraceLayer`
 * - Request body limit for the JSON and form extractors
 */

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::realtime::websocket_handler;
use crate::backend::server::state::AppState;

/// Body returned by the health check
pub const GREETING: &str = "hi";

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the Axum router with all routes and middleware configured
pub fn create_router(app_state: AppState) -> Router<()> {
    Router::new()
        .route("/", get(health))
        .route("/socket", get(websocket_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Permissive cross-origin policy
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
}

async fn health() -> &'static str {
    GREETING
}
