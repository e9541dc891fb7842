//! Read-only chat snapshot handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::chat::ChatHub;
use crate::web::dto::{HealthResponse, MessagesResponse, OnlineUsersResponse};
use crate::web::error::ApiError;

/// GET /api/health - Process status with chat counters.
pub async fn health(State(hub): State<Arc<ChatHub>>) -> Json<HealthResponse> {
    let stats = hub.stats().await;
    Json(HealthResponse {
        status: "OK",
        message: "聊天服务器运行正常",
        online_users: stats.online_users,
        total_messages: stats.total_messages,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /api/messages - Full message log.
pub async fn list_messages(State(hub): State<Arc<ChatHub>>) -> Json<MessagesResponse> {
    Json(MessagesResponse::new(hub.messages().await))
}

/// GET /api/online-users - Current roster.
pub async fn list_online_users(State(hub): State<Arc<ChatHub>>) -> Json<OnlineUsersResponse> {
    Json(OnlineUsersResponse::new(hub.online_users().await))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}
