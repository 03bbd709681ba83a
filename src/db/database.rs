use super::GameStore;
use crate::game::{self, Progress};
use crate::models::{DbUser, GameOutcome, GameResult, LeaderRow, PurchaseOutcome, User};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{Any, Pool, Row};
use tracing::info;

const USER_COLUMNS: &str = "id, telegram_id, username, first_name, coins, level, xp, \
                            xp_to_next_level, achievements_count, last_login";

pub async fn connect(database_url: &str, max_connections: u32) -> Result<Pool<Any>> {
    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &Pool<Any>, database_url: &str) -> Result<()> {
    if database_url.starts_with("postgres") {
        sqlx::raw_sql(include_str!("../../migrations/postgres/001_init.sql"))
            .execute(pool)
            .await?;
    } else {
        sqlx::raw_sql(include_str!("../../migrations/sqlite/001_init.sql"))
            .execute(pool)
            .await?;
    }
    info!("Database schema is up to date");
    Ok(())
}

#[derive(Clone)]
pub struct SqlStore {
    pool: Pool<Any>,
}

impl SqlStore {
    pub fn new(pool: Pool<Any>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<Any> {
        &self.pool
    }
}

fn user_from_row(row: &AnyRow) -> Result<DbUser> {
    Ok(DbUser {
        id: row.try_get("id")?,
        telegram_id: row.try_get("telegram_id")?,
        username: row.try_get("username")?,
        first_name: row.try_get("first_name")?,
        coins: row.try_get("coins")?,
        level: row.try_get("level")?,
        xp: row.try_get("xp")?,
        xp_to_next_level: row.try_get("xp_to_next_level")?,
        achievements_count: row.try_get("achievements_count")?,
        last_login: row.try_get("last_login")?,
    })
}

#[async_trait]
impl GameStore for SqlStore {
    async fn find_user(&self, telegram_id: i64) -> Result<Option<DbUser>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE telegram_id = $1");
        let row = sqlx::query(&sql)
            .bind(telegram_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn login_user(&self, user: &User) -> Result<DbUser> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (telegram_id, username, first_name, created_at, last_login)
             VALUES ($1, $2, $3, $4, $4)
             ON CONFLICT(telegram_id) DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name,
                last_login = excluded.last_login",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_user(user.id)
            .await?
            .ok_or_else(|| anyhow!("user {} missing right after upsert", user.id))
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderRow>> {
        let rows = sqlx::query(
            "SELECT username, first_name, coins, level
             FROM users
             ORDER BY coins DESC, id ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(LeaderRow {
                    username: row.try_get("username")?,
                    first_name: row.try_get("first_name")?,
                    coins: row.try_get("coins")?,
                    level: row.try_get("level")?,
                })
            })
            .collect()
    }

    async fn record_game(&self, user_id: i64, game: &GameResult) -> Result<GameOutcome> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO game_history (user_id, game_name, coins_earned, xp_earned, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user_id)
        .bind(&game.game_name)
        .bind(game.coins_earned)
        .bind(game.xp_earned)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        // The relative update takes the row lock before progress is read.
        let row = sqlx::query(
            "UPDATE users SET coins = coins + $1
             WHERE id = $2
             RETURNING coins, level, xp, xp_to_next_level",
        )
        .bind(game.coins_earned)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| anyhow!("user {user_id} not found"))?;

        let coins: i64 = row.try_get("coins")?;
        let current = Progress {
            level: row.try_get("level")?,
            xp: row.try_get("xp")?,
            xp_to_next_level: row.try_get("xp_to_next_level")?,
        };
        let next = game::apply_xp(current, game.xp_earned)
            .ok_or_else(|| anyhow!("xp for user {user_id} is out of range"))?;

        sqlx::query("UPDATE users SET level = $1, xp = $2, xp_to_next_level = $3 WHERE id = $4")
            .bind(next.level)
            .bind(next.xp)
            .bind(next.xp_to_next_level)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(GameOutcome {
            coins,
            level: next.level,
            xp: next.xp,
            xp_to_next_level: next.xp_to_next_level,
        })
    }

    async fn purchase(
        &self,
        user_id: i64,
        item_name: Option<&str>,
        price: i64,
    ) -> Result<PurchaseOutcome> {
        let mut tx = self.pool.begin().await?;

        let debited = sqlx::query(
            "UPDATE users SET coins = coins - $1
             WHERE id = $2 AND coins >= $1
             RETURNING coins",
        )
        .bind(price)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = debited else {
            let row = sqlx::query("SELECT coins FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| anyhow!("user {user_id} not found"))?;
            let coins: i64 = row.try_get("coins")?;
            tx.rollback().await?;
            return Ok(PurchaseOutcome::InsufficientFunds { coins });
        };
        let coins: i64 = row.try_get("coins")?;

        sqlx::query(
            "INSERT INTO shop_purchases (user_id, item_name, item_price, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(item_name)
        .bind(price)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PurchaseOutcome::Purchased { coins })
    }
}
