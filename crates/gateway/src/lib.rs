//! HTTP chat gateway for Anigate.
//!
//! Thin axum front end over the response generator: one JSON chat
//! endpoint plus a health check. The generator never returns an error, so
//! the chat handler always answers 200 with displayable text.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;
use uuid::Uuid;

use anigate_agent::Responder;
use anigate_config::GatewayConfig;

/// Shared state for the gateway.
pub struct GatewayState {
    pub responder: Responder,
}

type SharedState = Arc<GatewayState>;

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct ChatResponse {
    response: String,
}

/// Build the axum router with the chat and health routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let Some(message) = payload.message.filter(|m| !m.trim().is_empty()) else {
        return Json(ChatResponse {
            response: "Please say something!".into(),
        });
    };

    let request_id = Uuid::new_v4();
    info!(%request_id, chars = message.len(), "chat request");

    let response = state.responder.respond(&message).await;

    info!(%request_id, chars = response.len(), "chat reply");
    Json(ChatResponse { response })
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Start the gateway HTTP server.
pub async fn start(
    config: &GatewayConfig,
    responder: Responder,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(GatewayState { responder });
    let app = build_router(state);

    info!(%addr, "gateway listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
