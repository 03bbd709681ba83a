use anyhow::Result;
use gamebot::{api, config::Config, db, server, AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    std::fs::create_dir_all(&config.log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "gamebot.log");
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    let pool = db::connect(&config.database_url, config.database_max_connections).await?;
    db::run_migrations(&pool, &config.database_url).await?;

    let telegram = config.bot_token.clone().map(api::TelegramApi::new);
    if telegram.is_none() {
        warn!("TELEGRAM_BOT_TOKEN is not set, bot replies are disabled");
    }

    let state = Arc::new(AppState {
        store: Arc::new(db::SqlStore::new(pool)),
        messenger: telegram
            .clone()
            .map(|client| Arc::new(client) as Arc<dyn api::Messenger>),
        webapp_url: config.webapp_url.clone(),
    });

    info!("Game bot started");
    server::start_server(state, &config, telegram).await
}
