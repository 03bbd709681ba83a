mod database;

pub use database::{connect, run_migrations, SqlStore};

use crate::models::{DbUser, GameOutcome, GameResult, LeaderRow, PurchaseOutcome, User};
use anyhow::Result;
use async_trait::async_trait;

/// Persistence used by both HTTP handlers.
///
/// Every mutating method is atomic on its own; callers never need to wrap
/// calls in a transaction.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn find_user(&self, telegram_id: i64) -> Result<Option<DbUser>>;

    /// Creates the player on first contact, otherwise refreshes the profile
    /// fields. Always stamps `last_login`.
    async fn login_user(&self, user: &User) -> Result<DbUser>;

    /// Top `limit` players by coins, highest first, ties by signup order.
    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderRow>>;

    async fn record_game(&self, user_id: i64, game: &GameResult) -> Result<GameOutcome>;

    async fn purchase(&self, user_id: i64, item_name: Option<&str>, price: i64)
        -> Result<PurchaseOutcome>;
}
