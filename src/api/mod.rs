//! API 模块
//!
//! 提供 REST API 支持。

#[cfg(test)]
mod api_tests;
pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::api::app_state::AppState;
use crate::config::SecurityConfig;
use crate::security::middleware::security_headers_middleware;

/// CORS layer from configured origins, `*` allows any origin
fn cors_layer(config: &SecurityConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::auth_routes::create_auth_router())
        .merge(routes::chat_routes::create_chat_router())
        .merge(routes::transaction_routes::create_transaction_router());

    let server = &app_state.config.server;
    let mut router = Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(server.max_request_size))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout)))
        .layer(cors_layer(&app_state.config.security))
        .layer(TraceLayer::new_for_http());

    if app_state.config.security.security_headers_enabled {
        router = router.layer(axum::middleware::from_fn(security_headers_middleware));
    }

    router.with_state(app_state)
}
