pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod game;
pub mod handlers;
pub mod models;
pub mod server;
pub mod utils;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn db::GameStore>,
    /// `None` when no bot token is configured.
    pub messenger: Option<Arc<dyn api::Messenger>>,
    pub webapp_url: String,
}
