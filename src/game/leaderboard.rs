use crate::models::{non_empty, LeaderRow, LeaderboardEntry};

pub const LEADERBOARD_SIZE: i64 = 10;

const ANONYMOUS: &str = "Anonymous";

pub fn display_name(username: &Option<String>, first_name: &Option<String>) -> String {
    non_empty(username)
        .or_else(|| non_empty(first_name))
        .unwrap_or(ANONYMOUS)
        .to_string()
}

/// Projects rows already sorted by coins into ranked entries starting at 1.
pub fn rank(rows: Vec<LeaderRow>) -> Vec<LeaderboardEntry> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| LeaderboardEntry {
            rank: idx + 1,
            name: display_name(&row.username, &row.first_name),
            coins: row.coins,
            level: row.level,
        })
        .collect()
}
