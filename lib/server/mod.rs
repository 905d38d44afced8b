pub mod monitoring;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use log::info;
use monitoring::CHAT_METRICS;
use prometheus_client::encoding::text::encode;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct ChatResponse {
    pub resposta: String,
}

// Health endpoint handler
async fn health_handler() -> String {
    "Healthy".to_string()
}

async fn expose_metrics(state: State<Arc<AppState>>) -> String {
    let mut buffer = String::new();
    let registry = state.registry.read().await;
    encode(&mut buffer, &registry).unwrap();
    buffer
}

/// Always answers 200 with a `resposta` field; completion and persistence
/// failures are reflected inside the response text, never as a status.
async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let reply = state
        .chat
        .handle_message(&request.user_id, &request.message)
        .await;
    Json(ChatResponse {
        resposta: reply.resposta,
    })
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Hello, world!" }))
        .route("/health", get(health_handler))
        .route("/metrics", get(expose_metrics))
        .route("/focusbot", post(chat_handler))
        .with_state(state)
}

/// Starts the chat HTTP server on the supplied socket address.
pub async fn setup_server(
    state: Arc<AppState>,
    addr: SocketAddr,
) -> Result<tokio::task::JoinHandle<()>, std::io::Error> {
    {
        let mut registry = state.registry.write().await;
        CHAT_METRICS
            .get_or_init(|| async { monitoring::ChatMetrics::register(&mut registry, "focusbot") })
            .await;
    }

    let shutdown_token = state.shutdown_token.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("chat server listening on {addr}");
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
            })
            .await
            .unwrap();
    });

    Ok(server_handle)
}
