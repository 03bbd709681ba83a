use anyhow::{anyhow, bail, Context, Result};
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://gamebot.db?mode=rwc";
const DEFAULT_WEBAPP_URL: &str = "https://your-webapp-url.com";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    /// Without a token replies are dropped and no webhook is registered.
    pub bot_token: Option<String>,
    pub webapp_url: String,
    pub port: u16,
    pub game_api_path: String,
    pub webhook_path: String,
    pub webhook_url: Option<String>,
    pub webhook_secret_token: Option<String>,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow!("DATABASE_MAX_CONNECTIONS must be a positive integer, got {raw:?}"))?,
            None => 5,
        };
        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {raw:?}"))?,
            None => 8080,
        };

        let game_api_path = route_path("GAME_API_PATH", get("GAME_API_PATH"), "/api")?;
        let webhook_path = route_path("WEBHOOK_PATH", get("WEBHOOK_PATH"), "/webhook")?;
        if game_api_path == webhook_path {
            bail!("GAME_API_PATH and WEBHOOK_PATH must differ, both are {game_api_path}");
        }

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections,
            bot_token: get("TELEGRAM_BOT_TOKEN"),
            webapp_url: get("WEBAPP_URL").unwrap_or_else(|| DEFAULT_WEBAPP_URL.to_string()),
            port,
            game_api_path,
            webhook_path,
            webhook_url: get("WEBHOOK_URL"),
            webhook_secret_token: get("WEBHOOK_SECRET_TOKEN"),
            log_dir: get("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }
}

fn route_path(key: &str, value: Option<String>, default: &str) -> Result<String> {
    let path = value.unwrap_or_else(|| default.to_string());
    if !path.starts_with('/') {
        bail!("{key} must start with '/', got {path:?}");
    }
    if path == HEALTH_PATH {
        bail!("{key} must not be {HEALTH_PATH}");
    }
    Ok(path)
}
