//! Telegram webhook endpoint.

use crate::error::ApiError;
use crate::models::Update;
use crate::{handlers, AppState};
use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

pub const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

pub struct WebhookConfig {
    pub path: String,
    pub secret_token: Option<String>,
}

pub fn router(state: Arc<AppState>, config: Arc<WebhookConfig>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    Router::new()
        .route(
            &config.path,
            post(webhook_handler).fallback(method_not_allowed),
        )
        .layer(axum::middleware::from_fn_with_state(
            config.clone(),
            verify_secret_token_middleware,
        ))
        .layer(cors)
        .with_state(state)
}

async fn verify_secret_token_middleware(
    State(config): State<Arc<WebhookConfig>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected_token) = &config.secret_token {
        let header_value = request
            .headers()
            .get(SECRET_TOKEN_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("Missing secret token".to_string()))?
            .to_str()
            .map_err(|_| ApiError::BadRequest("Malformed secret token".to_string()))?;

        if header_value != expected_token {
            return Err(ApiError::Unauthorized("Invalid secret token".to_string()));
        }
    }

    Ok(next.run(request).await)
}

/// Always acknowledges a parsed update; only parse or storage failures
/// produce an error status.
async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let update: Update = serde_json::from_slice(&body).map_err(anyhow::Error::from)?;
    handlers::process_update(&state, update).await?;
    Ok(Json(json!({ "ok": true })))
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}
