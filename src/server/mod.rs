pub mod game_api;
pub mod webhook;

pub use webhook::WebhookConfig;

use crate::api::TelegramApi;
use crate::config::{Config, HEALTH_PATH};
use crate::AppState;
use anyhow::{anyhow, Result};
use axum::{http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Mounts the Game API, the webhook and the health check.
pub fn create_router(
    state: Arc<AppState>,
    game_api_path: &str,
    webhook_config: Arc<WebhookConfig>,
) -> Router {
    Router::new()
        .merge(game_api::router(state.clone(), game_api_path))
        .merge(webhook::router(state, webhook_config))
        .route(HEALTH_PATH, get(health_check))
}

pub async fn start_server(
    state: Arc<AppState>,
    config: &Config,
    telegram: Option<TelegramApi>,
) -> Result<()> {
    let registered = match (&telegram, &config.webhook_url) {
        (Some(telegram), Some(webhook_url)) => {
            info!(webhook_url = %webhook_url, "Setting webhook URL");
            if let Err(err) = telegram
                .set_webhook(webhook_url, config.webhook_secret_token.as_deref())
                .await
            {
                error!("Failed to set webhook: {err:?}");
                return Err(anyhow!("Failed to set webhook: {}", err));
            }
            info!("Webhook set successfully");
            log_webhook_status(telegram).await;
            Some(telegram.clone())
        }
        (None, Some(_)) => {
            warn!("WEBHOOK_URL is set but TELEGRAM_BOT_TOKEN is not, skipping webhook registration");
            None
        }
        _ => None,
    };

    let webhook_config = Arc::new(WebhookConfig {
        path: config.webhook_path.clone(),
        secret_token: config.webhook_secret_token.clone(),
    });
    let app = create_router(state, &config.game_api_path, webhook_config);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(
        port = config.port,
        game_api_path = %config.game_api_path,
        webhook_path = %config.webhook_path,
        "Starting server on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(registered));

    if let Err(err) = server.await {
        error!("Server error: {err:?}");
        return Err(anyhow!("Server error: {}", err));
    }

    Ok(())
}

/// Reports what Telegram sees for the registered webhook.
async fn log_webhook_status(telegram: &TelegramApi) {
    match telegram.get_webhook_info().await {
        Ok(info) => {
            let pending = info["pending_update_count"].as_i64().unwrap_or(0);
            match info["last_error_message"].as_str() {
                Some(last_error) => warn!(
                    pending_updates = pending,
                    last_error = last_error,
                    "Webhook registered with a previous delivery error"
                ),
                None => info!(pending_updates = pending, "Webhook status checked"),
            }
        }
        Err(err) => warn!("Failed to fetch webhook info: {err:?}"),
    }
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Waits for Ctrl+C or SIGTERM, then unregisters the webhook if this
/// process registered one.
async fn shutdown_signal(registered: Option<TelegramApi>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {err:?}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {err:?}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    let Some(telegram) = registered else {
        info!("Shutdown signal received");
        return;
    };

    info!("Shutdown signal received, deleting webhook...");
    if let Err(err) = telegram.delete_webhook().await {
        warn!("Failed to delete webhook during shutdown: {err:?}");
    } else {
        info!("Webhook deleted successfully");
    }
}
