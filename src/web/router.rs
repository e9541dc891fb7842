//! Router configuration for the Web API.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::chat::ChatHub;
use crate::config::WebConfig;

use super::handlers::{health, list_messages, list_online_users, not_found};
use super::middleware::create_cors_layer;
use super::ws::chat_ws_handler;

/// Create the main router.
///
/// Routes:
/// - `GET /api/health`
/// - `GET /api/messages`
/// - `GET /api/online-users`
/// - `GET /api/chat/ws` (WebSocket upgrade)
///
/// Everything else is served from `static_path` when static serving is
/// enabled, or answered with a JSON 404.
pub fn create_router(hub: Arc<ChatHub>, web_config: &WebConfig) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/messages", get(list_messages))
        .route("/online-users", get(list_online_users))
        .route("/chat/ws", get(chat_ws_handler));

    let router = Router::new().nest("/api", api_routes);

    let router = if web_config.serve_static {
        tracing::info!("Serving static files from {}", web_config.static_path);
        router.fallback_service(ServeDir::new(&web_config.static_path))
    } else {
        router.fallback(not_found)
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&web_config.cors_origins)),
        )
        .with_state(hub)
}
