//! Webhook endpoint
//!
//! Max pushes the same update objects it returns from `GET /updates`. Once an
//! update passes validation it is acknowledged with 200, even if handling
//! fails, so Max does not keep redelivering it.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info, warn};
use serde_json::{json, Value};
use std::sync::Arc;

use super::update::Update;
use crate::commands::ConversationEngine;

pub const SECRET_HEADER: &str = "x-max-bot-api-secret";

#[derive(Clone)]
struct WebhookState {
    engine: Arc<ConversationEngine>,
    secret: Option<String>,
}

pub fn router(engine: Arc<ConversationEngine>, secret: &str) -> Router {
    let secret = Some(secret.trim().to_string()).filter(|s| !s.is_empty());
    Router::new()
        .route("/updates", post(receive_update))
        .route("/health", get(health))
        .route("/", get(root))
        .with_state(WebhookState { engine, secret })
}

pub async fn serve(engine: Arc<ConversationEngine>, secret: &str, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Webhook listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(engine, secret)).await?;
    Ok(())
}

fn secret_is_valid(headers: &HeaderMap, expected: &Option<String>) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|candidate| candidate == expected)
}

async fn receive_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if !secret_is_valid(&headers, &state.secret) {
        warn!("Webhook secret validation failed");
        return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid secret"})));
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Webhook body is not JSON: {e}");
            return (StatusCode::BAD_REQUEST, Json(json!({"detail": "Invalid JSON"})));
        }
    };
    info!("📥 Received webhook update: {}", payload["update_type"]);

    if payload.get("update_type").is_none() || payload.get("timestamp").is_none() {
        warn!("Invalid update structure: missing required fields");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Missing update_type or timestamp"})),
        );
    }

    match serde_json::from_value::<Update>(payload) {
        Ok(update) => {
            if let Err(e) = state.engine.handle_update(update).await {
                error!("Error handling webhook update: {e:#}");
            }
        }
        Err(e) => warn!("Skipping malformed webhook update: {e}"),
    }

    (StatusCode::OK, Json(json!({"success": true})))
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Max Bot WebHook",
        "endpoints": ["/updates (POST)", "/health (GET)", "/ (GET)"]
    }))
}
