//! Operator HTTP API
//!
//! Every route except `/health` requires `Authorization: Bearer <token>`.
//! The check happens here, before any handler touches the swap engine.

use crate::handlers::{self, AppState};
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::auth::RequireAuthorizationLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>, operator_token: &str) -> Router {
    let operator_routes = Router::new()
        .route("/status", get(handlers::status))
        .route("/trading/start", post(handlers::start_trading))
        .route("/trading/stop", post(handlers::stop_trading))
        .route("/buy", get(handlers::buy_options).post(handlers::buy))
        .route("/swaps/:signature", get(handlers::swap_status))
        .route_layer(RequireAuthorizationLayer::bearer(operator_token));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(operator_routes)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
