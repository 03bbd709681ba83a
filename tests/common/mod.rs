#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use gamebot::{
    api::Messenger,
    db::{self, GameStore, SqlStore},
    models::{Chat, Message, OutboundMessage, Update, User},
    server::{create_router, WebhookConfig},
    AppState,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

pub const WEBAPP_URL: &str = "https://game.example.com";

pub async fn setup_store() -> SqlStore {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    db::run_migrations(&pool, "sqlite::memory:").await.unwrap();
    SqlStore::new(pool)
}

/// Records every delivered reply, optionally failing each delivery.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<OutboundMessage>>,
    fail: bool,
}

impl RecordingMessenger {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn deliver(&self, message: &OutboundMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            return Err(anyhow!("simulated delivery failure"));
        }
        Ok(())
    }
}

pub fn build_state(store: SqlStore, messenger: Option<Arc<RecordingMessenger>>) -> Arc<AppState> {
    Arc::new(AppState {
        store: Arc::new(store),
        messenger: messenger.map(|m| m as Arc<dyn Messenger>),
        webapp_url: WEBAPP_URL.to_string(),
    })
}

pub fn build_app(state: Arc<AppState>, secret_token: Option<&str>) -> Router {
    create_router(
        state,
        "/api",
        Arc::new(WebhookConfig {
            path: "/webhook".to_string(),
            secret_token: secret_token.map(String::from),
        }),
    )
}

pub fn telegram_user(id: i64, username: Option<&str>, first_name: Option<&str>) -> User {
    User {
        id,
        is_bot: false,
        username: username.map(String::from),
        first_name: first_name.map(String::from),
        last_name: None,
    }
}

pub fn text_update(from: User, text: Option<&str>) -> Update {
    Update {
        update_id: 1,
        message: Some(Message {
            message_id: 1,
            chat: Chat { id: from.id },
            text: text.map(String::from),
            from: Some(from),
        }),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

/// Gives a fresh player a balance by recording a game worth `coins`.
pub async fn seed_user(
    store: &SqlStore,
    telegram_id: i64,
    username: Option<&str>,
    first_name: Option<&str>,
    coins: i64,
) -> i64 {
    let user = store
        .login_user(&telegram_user(telegram_id, username, first_name))
        .await
        .unwrap();
    if coins > 0 {
        store
            .record_game(
                user.id,
                &gamebot::models::GameResult {
                    game_name: Some("seed".to_string()),
                    coins_earned: coins,
                    xp_earned: 0,
                },
            )
            .await
            .unwrap();
    }
    user.id
}
