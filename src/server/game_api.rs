//! REST-like API consumed by the web mini-app.

use crate::error::ApiError;
use crate::game::{self, LEADERBOARD_SIZE};
use crate::models::{DbUser, GameResult, PurchaseOutcome};
use crate::AppState;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequestParts, Query, State},
    http::{header, request::Parts, HeaderName, Method},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub const TELEGRAM_USER_ID_HEADER: &str = "x-telegram-user-id";

/// Caller identity taken from the `X-Telegram-User-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelegramUserId(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for TelegramUserId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(TELEGRAM_USER_ID_HEADER)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ApiError::Unauthorized(
                    "Unauthorized: X-Telegram-User-Id header required".to_string(),
                )
            })?;

        raw.to_str()
            .ok()
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(TelegramUserId)
            .ok_or_else(|| ApiError::BadRequest("Invalid telegram user id".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiAction {
    FetchUser,
    Leaderboard,
    PlayGame(GameResult),
    BuyItem {
        item_name: Option<String>,
        item_price: i64,
    },
}

#[derive(Debug, Deserialize)]
pub struct ActionQuery {
    pub action: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ActionBody {
    PlayGame {
        game_name: Option<String>,
        #[serde(default)]
        coins_earned: i64,
        #[serde(default)]
        xp_earned: i64,
    },
    BuyItem {
        item_name: Option<String>,
        #[serde(default)]
        item_price: i64,
    },
}

fn invalid_request() -> ApiError {
    ApiError::BadRequest("Invalid request".to_string())
}

/// Upper bound for any amount a single request may carry.
pub const MAX_AMOUNT: i64 = 1_000_000_000;

fn checked_amount(field: &str, value: i64) -> Result<i64, ApiError> {
    if value < 0 {
        return Err(ApiError::BadRequest(format!("{field} must not be negative")));
    }
    if value > MAX_AMOUNT {
        return Err(ApiError::BadRequest(format!(
            "{field} must not exceed {MAX_AMOUNT}"
        )));
    }
    Ok(value)
}

impl ApiAction {
    /// Read actions; a missing `action` means the profile.
    pub fn from_query(action: Option<&str>) -> Result<Self, ApiError> {
        match action {
            None | Some("user") => Ok(ApiAction::FetchUser),
            Some("leaderboard") => Ok(ApiAction::Leaderboard),
            Some(_) => Err(invalid_request()),
        }
    }

    /// Write actions from a POST body.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let value: serde_json::Value = if body.is_empty() {
            json!({})
        } else {
            serde_json::from_slice(body)
                .map_err(|_| ApiError::BadRequest("Invalid JSON body".to_string()))?
        };

        let parsed: ActionBody = serde_json::from_value(value).map_err(|_| invalid_request())?;
        match parsed {
            ActionBody::PlayGame {
                game_name,
                coins_earned,
                xp_earned,
            } => Ok(ApiAction::PlayGame(GameResult {
                game_name,
                coins_earned: checked_amount("coins_earned", coins_earned)?,
                xp_earned: checked_amount("xp_earned", xp_earned)?,
            })),
            ActionBody::BuyItem {
                item_name,
                item_price,
            } => Ok(ApiAction::BuyItem {
                item_name,
                item_price: checked_amount("item_price", item_price)?,
            }),
        }
    }
}

pub fn router(state: Arc<AppState>, path: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(TELEGRAM_USER_ID_HEADER),
        ])
        .max_age(Duration::from_secs(86400));

    Router::new()
        .route(
            path,
            get(handle_get)
                .post(handle_post)
                .fallback(handle_unmatched_method),
        )
        .layer(cors)
        .with_state(state)
}

async fn handle_get(
    State(state): State<Arc<AppState>>,
    TelegramUserId(telegram_id): TelegramUserId,
    Query(query): Query<ActionQuery>,
) -> Result<Response, ApiError> {
    let action = ApiAction::from_query(query.action.as_deref())?;
    execute(&state, telegram_id, action).await
}

async fn handle_post(
    State(state): State<Arc<AppState>>,
    TelegramUserId(telegram_id): TelegramUserId,
    body: Bytes,
) -> Result<Response, ApiError> {
    let action = ApiAction::from_body(&body)?;
    execute(&state, telegram_id, action).await
}

/// Other methods still need a valid caller before being refused.
async fn handle_unmatched_method(_caller: TelegramUserId) -> ApiError {
    invalid_request()
}

async fn require_user(state: &AppState, telegram_id: i64) -> Result<DbUser, ApiError> {
    state
        .store
        .find_user(telegram_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

pub async fn execute(
    state: &AppState,
    telegram_id: i64,
    action: ApiAction,
) -> Result<Response, ApiError> {
    match action {
        ApiAction::FetchUser => {
            let user = require_user(state, telegram_id).await?;
            Ok(Json(user).into_response())
        }
        ApiAction::Leaderboard => {
            let rows = state.store.leaderboard(LEADERBOARD_SIZE).await?;
            let leaderboard = game::rank(rows);
            Ok(Json(json!({ "leaderboard": leaderboard })).into_response())
        }
        ApiAction::PlayGame(result) => {
            let user = require_user(state, telegram_id).await?;
            let outcome = state.store.record_game(user.id, &result).await?;
            info!(
                telegram_id = telegram_id,
                game = result.game_name.as_deref().unwrap_or(""),
                coins_earned = result.coins_earned,
                xp_earned = result.xp_earned,
                level = outcome.level,
                leveled_up = outcome.level > user.level,
                "Game result recorded"
            );
            Ok(Json(json!({
                "success": true,
                "coins": outcome.coins,
                "level": outcome.level,
            }))
            .into_response())
        }
        ApiAction::BuyItem {
            item_name,
            item_price,
        } => {
            let user = require_user(state, telegram_id).await?;
            match state
                .store
                .purchase(user.id, item_name.as_deref(), item_price)
                .await?
            {
                PurchaseOutcome::Purchased { coins } => {
                    info!(
                        telegram_id = telegram_id,
                        item = item_name.as_deref().unwrap_or(""),
                        price = item_price,
                        coins = coins,
                        "Item purchased"
                    );
                    Ok(Json(json!({ "success": true, "coins": coins })).into_response())
                }
                PurchaseOutcome::InsufficientFunds { coins } => {
                    info!(
                        telegram_id = telegram_id,
                        price = item_price,
                        coins = coins,
                        "Purchase rejected, not enough coins"
                    );
                    Err(ApiError::InsufficientFunds)
                }
            }
        }
    }
}
